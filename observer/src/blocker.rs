use tracing::{debug, trace};

use crate::subject::Subject;

/// Suspends all dispatch on a subject for as long as it is alive.
///
/// The first blocker on a subject swaps its dispatch list for an empty one; when the last
/// blocker is dropped the original list comes back, order preserved. Blockers may be dropped in
/// any order. Owners are not involved, so their registries are untouched while blocked.
///
/// Connections made to the subject while it is blocked are discarded on restore and their
/// handles released, so their ids go stale. Connections removed while blocked stay removed.
#[must_use = "dispatch resumes as soon as the blocker is dropped"]
pub struct Blocker<'a, Args> {
    subject: &'a Subject<Args>,
}

impl<'a, Args> Blocker<'a, Args> {
    pub fn new(subject: &'a Subject<Args>) -> Self {
        let depth = subject.suspend();
        trace!(depth, "subject blocked");
        Self { subject }
    }
}

impl<Args> Drop for Blocker<'_, Args> {
    fn drop(&mut self) {
        let discarded = self.subject.resume();
        if !discarded.is_empty() {
            debug!(discarded = discarded.len(), "discarding connections made while blocked");
        }
        for handle in &discarded {
            handle.detach_from_owner();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Owner;
    use std::{cell::RefCell, rc::Rc};

    fn recorder(owner: &Owner, subject: &Subject<(i32,)>, log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> crate::HandleId {
        let log = log.clone();
        owner.connect(subject, move |value: i32| log.borrow_mut().push(format!("{tag}{value}")))
    }

    #[test]
    fn blocks_then_restores_in_order() {
        let owner = Owner::new();
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&owner, &subject, &log, "a");
        recorder(&owner, &subject, &log, "b");

        {
            let _blocker = Blocker::new(&subject);
            assert!(subject.is_blocked());
            assert!(subject.is_empty());
            subject.notify((1,));
            assert_eq!(owner.len(), 2);
        }

        assert!(!subject.is_blocked());
        subject.notify((2,));
        assert_eq!(*log.borrow(), ["a2", "b2"]);
    }

    #[test]
    fn connection_made_while_blocked_is_discarded() {
        let owner = Owner::new();
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&owner, &subject, &log, "a");

        let late = {
            let _blocker = subject.block();
            recorder(&owner, &subject, &log, "late")
        };

        assert!(!owner.is_connected(late));
        assert_eq!(owner.len(), 1);
        subject.notify((3,));
        assert_eq!(*log.borrow(), ["a3"]);
    }

    #[test]
    fn disconnect_while_blocked_stays_disconnected() {
        let owner = Owner::new();
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&owner, &subject, &log, "a");
        recorder(&owner, &subject, &log, "b");

        {
            let _blocker = subject.block();
            owner.disconnect(a).unwrap();
        }

        assert_eq!(subject.len(), 1);
        subject.notify((4,));
        assert_eq!(*log.borrow(), ["b4"]);
    }

    #[test]
    fn owner_dropped_while_blocked_is_pruned() {
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let keeper = Owner::new();
        recorder(&keeper, &subject, &log, "k");
        {
            let _blocker = subject.block();
            let owner = Owner::new();
            recorder(&owner, &subject, &log, "gone");
        }
        let transient = Owner::new();
        recorder(&transient, &subject, &log, "t");
        {
            let _blocker = subject.block();
            drop(transient);
        }

        assert_eq!(subject.len(), 1);
        subject.notify((5,));
        assert_eq!(*log.borrow(), ["k5"]);
    }

    #[test]
    fn nested_blockers_restore_outermost_list() {
        let owner = Owner::new();
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        recorder(&owner, &subject, &log, "a");

        {
            let _outer = subject.block();
            {
                let _inner = subject.block();
                subject.notify((6,));
            }
            assert!(subject.is_blocked());
            subject.notify((7,));
        }

        subject.notify((8,));
        assert_eq!(*log.borrow(), ["a8"]);
    }

    #[test]
    fn blockers_dropped_out_of_order_keep_registrations() {
        let owner = Owner::new();
        let subject = Subject::<(i32,)>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let a = recorder(&owner, &subject, &log, "a");

        let first = subject.block();
        let second = subject.block();
        let late = recorder(&owner, &subject, &log, "late");
        drop(first);
        assert!(subject.is_blocked());
        subject.notify((1,));
        drop(second);

        assert!(!subject.is_blocked());
        assert!(owner.is_connected(a));
        assert!(!owner.is_connected(late));
        assert_eq!(subject.len(), 1);
        subject.notify((2,));
        assert_eq!(*log.borrow(), ["a2"]);
    }
}
