mod common;
use ankurah_observer::*;
use common::watcher;

#[test]
fn blocker_round_trip_preserves_dispatch() {
    let owner = Owner::new();
    let subject = Subject::<(i32,)>::new();
    let (accumulate, check) = watcher::<(char, i32)>();
    for tag in ['1', '2'] {
        let accumulate = accumulate.clone();
        owner.connect(&subject, move |value: i32| accumulate((tag, value)));
    }

    subject.notify((0,));
    let before = check();

    {
        let _blocker = Blocker::new(&subject);
        subject.notify((99,));
        assert!(check().is_empty());
    }

    subject.notify((0,));
    assert_eq!(check(), before);
    assert_eq!(before, [('1', 0), ('2', 0)]);
}

#[test]
fn blocking_one_subject_leaves_others_alone() {
    let owner = Owner::new();
    let (blocked, open) = (Subject::<(i32,)>::new(), Subject::<(i32,)>::new());
    let (accumulate, check) = watcher::<i32>();
    owner.connect(&blocked, accumulate.clone());
    owner.connect(&open, accumulate);

    let blocker = blocked.block();
    blocked.notify((1,));
    open.notify((2,));
    drop(blocker);
    blocked.notify((3,));

    assert_eq!(check(), [2, 3]);
}

#[test]
fn owner_registry_is_untouched_while_blocked() {
    let owner = Owner::new();
    let subject = Subject::<()>::new();
    let id = owner.connect(&subject, || ());

    let blocker = subject.block();
    assert!(owner.is_connected(id));
    assert_eq!(owner.len(), 1);
    assert!(subject.is_empty());
    drop(blocker);

    assert_eq!(subject.len(), 1);
}

#[test]
fn dropping_owner_while_blocked_is_safe() {
    let subject = Subject::<(u8,)>::new();
    let (accumulate, check) = watcher::<u8>();
    let owner = Owner::new();
    owner.connect(&subject, accumulate);

    {
        let _blocker = subject.block();
        drop(owner);
    }

    assert!(subject.is_empty());
    subject.notify((1,));
    assert!(check().is_empty());
}

#[test]
fn blockers_released_in_creation_order_restore_dispatch() {
    let owner = Owner::new();
    let subject = Subject::<(i32,)>::new();
    let (accumulate, check) = watcher::<i32>();
    let id = owner.connect(&subject, accumulate);

    let first = subject.block();
    let second = subject.block();
    drop(first);
    drop(second);

    assert!(owner.is_connected(id));
    assert_eq!(subject.len(), 1);
    subject.notify((3,));
    assert_eq!(check(), [3]);
}
