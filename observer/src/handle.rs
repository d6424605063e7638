use std::any::Any;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::trace;

use crate::adapter::Adapter;
use crate::owner::OwnerCore;
use crate::subject::DispatchList;

static NEXT_OWNER_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies one [`Owner`](crate::Owner). Never reused within a process.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct OwnerId(u64);

impl OwnerId {
    pub(crate) fn next() -> Self { Self(NEXT_OWNER_ID.fetch_add(1, Ordering::Relaxed)) }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Identity of one connection, returned by the `Owner::connect*` family.
///
/// The token is checked: it names the owner that minted it plus a per-owner serial that is
/// never handed out twice. Once the connection is gone (disconnected, released because its
/// subject was dropped, or discarded by a [`Blocker`](crate::Blocker)) the id stays stale forever.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct HandleId {
    owner: OwnerId,
    serial: u64,
}

impl HandleId {
    pub(crate) fn new(owner: OwnerId, serial: u64) -> Self { Self { owner, serial } }

    /// The owner this handle was created through
    pub fn owner(&self) -> OwnerId { self.owner }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}:{}", self.owner, self.serial) }
}

/// A non-owning reference to a handle, as stored in a subject's dispatch list.
/// It never keeps the owner alive.
#[derive(Clone)]
pub(crate) struct HandleRef {
    id: HandleId,
    owner: Weak<OwnerCore>,
}

impl HandleRef {
    pub(crate) fn new(id: HandleId, owner: Weak<OwnerCore>) -> Self { Self { id, owner } }

    pub(crate) fn id(&self) -> HandleId { self.id }

    /// Whether the owning registry still holds this handle
    pub(crate) fn is_held(&self) -> bool { self.owner.upgrade().is_some_and(|owner| owner.holds(self.id)) }

    /// Asks the owner to release the handle. Called when the subject side goes away first.
    pub(crate) fn detach_from_owner(&self) {
        if let Some(owner) = self.owner.upgrade() {
            owner.release(self.id);
        }
    }

    /// Invoke the handle's callback with `args`.
    ///
    /// The callback is cloned out of the owner's registry before it runs, so no registry borrow
    /// is held while user code executes and a nested `notify` reaches it again. A handle
    /// released during its own call keeps running until the call returns, then is freed.
    pub(crate) fn dispatch<Args: 'static>(&self, args: &Args) {
        let Some(owner) = self.owner.upgrade() else {
            trace!(handle = %self.id, "owner gone, skipping");
            return;
        };
        let Some(callback) = owner.callback(self.id) else {
            trace!(handle = %self.id, "handle released, skipping");
            return;
        };
        // no strong reference to the registry while user code runs
        drop(owner);
        if let Some(adapter) = callback.downcast_ref::<Adapter<Args>>() {
            if !adapter.invoke(args) {
                trace!(handle = %self.id, "target unavailable, notification dropped");
            }
        }
    }
}

/// The owned record of one connection. Lives in exactly one owner registry.
pub(crate) struct Handle {
    id: HandleId,
    subject: Weak<dyn DispatchList>,
    arity: usize,
    // an `Adapter<Args>`; cloned only for the duration of a dispatch
    callback: Rc<dyn Any>,
}

impl Handle {
    pub(crate) fn new<Args: 'static>(id: HandleId, subject: Weak<dyn DispatchList>, adapter: Adapter<Args>) -> Self {
        Self { id, subject, arity: adapter.arity(), callback: Rc::new(adapter) }
    }

    pub(crate) fn arity(&self) -> usize { self.arity }

    pub(crate) fn callback(&self) -> Rc<dyn Any> { self.callback.clone() }

    /// Removes this handle from its subject's dispatch list, if the subject is still alive.
    /// Called at most once per handle, from disconnect or owner teardown.
    pub(crate) fn detach_from_subject(&self) {
        if let Some(subject) = self.subject.upgrade() {
            if !subject.remove_handle(self.id) {
                trace!(handle = %self.id, "handle was not in the dispatch list");
            }
        }
    }
}

/// Type-erased back-reference from a handle to its subject's dispatch list
pub(crate) fn downgrade_subject<T: DispatchList + 'static>(core: &Rc<T>) -> Weak<dyn DispatchList> {
    let weak: Weak<T> = Rc::downgrade(core);
    weak
}
