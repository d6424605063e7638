use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::blocker::Blocker;
use crate::handle::{downgrade_subject, HandleId, HandleRef};

/// A typed publisher. `Args` is the tuple of values every notification carries.
///
/// The subject does not own its handles; it keeps non-owning references in registration
/// order. Dropping it asks every owner still holding one of its handles to release it.
pub struct Subject<Args> {
    core: Rc<SubjectCore<Args>>,
}

/// Shared dispatch state of a subject. The `Subject` value holds the only strong reference;
/// handles and relays point here weakly.
pub(crate) struct SubjectCore<Args> {
    handles: RefCell<Vec<HandleRef>>,
    blockers: Cell<usize>,
    // the dispatch list as it was when the first live blocker was created
    suspended: RefCell<Vec<HandleRef>>,
    _args: PhantomData<fn(Args)>,
}

/// Removal surface a handle uses to take itself out of its subject, independent of `Args`
pub(crate) trait DispatchList {
    fn remove_handle(&self, id: HandleId) -> bool;
}

impl<Args: 'static> SubjectCore<Args> {
    fn with_capacity(capacity: usize) -> Self {
        Self { handles: RefCell::new(Vec::with_capacity(capacity)), blockers: Cell::new(0), suspended: RefCell::new(Vec::new()), _args: PhantomData }
    }

    /// Invoke every registered handle, oldest first.
    pub(crate) fn notify(&self, args: Args) {
        // Iterate over a snapshot so callbacks may connect and disconnect freely. Entries
        // released after the snapshot was taken are skipped at dispatch.
        let snapshot = self.handles.borrow().clone();
        for handle in &snapshot {
            handle.dispatch(&args);
        }
    }
}

impl<Args> DispatchList for SubjectCore<Args> {
    fn remove_handle(&self, id: HandleId) -> bool {
        let mut handles = self.handles.borrow_mut();
        // Connections that churn tend to be the most recent ones, so search from the back
        match handles.iter().rposition(|handle| handle.id() == id) {
            Some(position) => {
                handles.remove(position);
                true
            }
            None => false,
        }
    }
}

impl<Args: 'static> Default for Subject<Args> {
    fn default() -> Self { Self::new() }
}

impl<Args: 'static> Subject<Args> {
    pub fn new() -> Self { Self::with_capacity(0) }

    /// Create a subject whose dispatch list has room for `capacity` handles
    pub fn with_capacity(capacity: usize) -> Self { Self { core: Rc::new(SubjectCore::with_capacity(capacity)) } }

    /// Invoke every connected callback with `args`, in connection order, on the calling thread.
    ///
    /// Connections made during the pass are not visited until the next one. Connections removed
    /// during the pass are not visited at all.
    pub fn notify(&self, args: Args) { self.core.notify(args) }

    /// Number of handles currently in the dispatch list. Zero while blocked.
    pub fn len(&self) -> usize { self.core.handles.borrow().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Whether a [`Blocker`] is currently suspending this subject
    pub fn is_blocked(&self) -> bool { self.core.blockers.get() > 0 }

    /// Suspend dispatch until the returned guard is dropped
    pub fn block(&self) -> Blocker<'_, Args> { Blocker::new(self) }

    pub(crate) fn register_handle(&self, handle: HandleRef) { self.core.handles.borrow_mut().push(handle); }

    pub(crate) fn dispatch_list(&self) -> Weak<dyn DispatchList> { downgrade_subject(&self.core) }

    pub(crate) fn downgrade(&self) -> Weak<SubjectCore<Args>> { Rc::downgrade(&self.core) }
}

impl<Args> Subject<Args> {
    #[cfg(test)]
    pub(crate) fn remove_handle(&self, id: HandleId) -> bool { self.core.remove_handle(id) }

    /// Register one more blocker. The first one swaps the dispatch list out, leaving an empty
    /// one in place. Returns the number of live blockers.
    pub(crate) fn suspend(&self) -> usize {
        let depth = self.core.blockers.get() + 1;
        self.core.blockers.set(depth);
        if depth == 1 {
            let handles = std::mem::take(&mut *self.core.handles.borrow_mut());
            *self.core.suspended.borrow_mut() = handles;
        }
        depth
    }

    /// Release one blocker, in any order. When the last one goes, the suspended list is put back
    /// minus anything released in the meantime, and whatever was registered while blocked is
    /// returned for the caller to discard.
    pub(crate) fn resume(&self) -> Vec<HandleRef> {
        let depth = self.core.blockers.get().saturating_sub(1);
        self.core.blockers.set(depth);
        if depth > 0 {
            return Vec::new();
        }
        let mut saved = std::mem::take(&mut *self.core.suspended.borrow_mut());
        // the list must never name a released handle
        saved.retain(HandleRef::is_held);
        std::mem::replace(&mut *self.core.handles.borrow_mut(), saved)
    }
}

impl<Args> std::fmt::Debug for Subject<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subject").field("handles", &self.core.handles.borrow().len()).field("blockers", &self.core.blockers.get()).finish()
    }
}

impl<Args> Drop for Subject<Args> {
    fn drop(&mut self) {
        let mut handles = std::mem::take(&mut *self.core.handles.borrow_mut());
        // only non-empty if a blocker was leaked
        handles.append(&mut self.core.suspended.borrow_mut());
        debug!(handles = handles.len(), "subject dropped, releasing handles");
        for handle in &handles {
            handle.detach_from_owner();
        }
    }
}
