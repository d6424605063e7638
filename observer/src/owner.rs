use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::adapter::{Adapter, Callback, Method};
use crate::args::{Arguments, Leading};
use crate::error::ObserverError;
use crate::handle::{Handle, HandleId, HandleRef, OwnerId};
use crate::subject::Subject;

/// The lifetime authority for a set of connections.
///
/// Every handle created through an owner is stored by value in the owner's registry, and only
/// there. Dropping the owner removes each of its handles from whatever subject it is attached
/// to, then frees them. Owners and subjects may be dropped in either order.
///
/// Not thread safe: an owner and the subjects it is connected to must stay on one thread.
pub struct Owner {
    core: Rc<OwnerCore>,
}

/// Registry state of an owner. The `Owner` value holds the only strong reference; subject
/// dispatch lists point here weakly.
pub(crate) struct OwnerCore {
    id: OwnerId,
    next_serial: Cell<u64>,
    handles: RefCell<BTreeMap<HandleId, Handle>>,
}

impl OwnerCore {
    fn mint(&self) -> HandleId {
        let serial = self.next_serial.get();
        self.next_serial.set(serial + 1);
        HandleId::new(self.id, serial)
    }

    pub(crate) fn holds(&self, id: HandleId) -> bool { self.handles.borrow().contains_key(&id) }

    /// Drop a handle at its subject's request. The subject has already forgotten it.
    pub(crate) fn release(&self, id: HandleId) {
        let released = self.handles.borrow_mut().remove(&id);
        if released.is_some() {
            trace!(handle = %id, "released by subject");
        }
        // dropped here, after the registry borrow has ended
        drop(released);
    }

    /// A shared reference to a handle's callback, for one dispatch
    pub(crate) fn callback(&self, id: HandleId) -> Option<Rc<dyn Any>> { self.handles.borrow().get(&id).map(Handle::callback) }
}

impl Default for Owner {
    fn default() -> Self { Self::new() }
}

impl Owner {
    pub fn new() -> Self {
        Self { core: Rc::new(OwnerCore { id: OwnerId::next(), next_serial: Cell::new(0), handles: RefCell::new(BTreeMap::new()) }) }
    }

    pub fn id(&self) -> OwnerId { self.core.id }

    /// Connect a free function or closure to `subject`.
    ///
    /// The callable may take any leading prefix of the subject's values; the rest are dropped.
    /// It is called on every subsequent `notify` until disconnected, or until this owner or the
    /// subject is dropped.
    pub fn connect<Args, M, F>(&self, subject: &Subject<Args>, callback: F) -> HandleId
    where
        Args: 'static,
        F: Callback<Args, M>,
    {
        self.attach(subject, Adapter::callable(callback))
    }

    /// Connect a method of `instance` to `subject`.
    ///
    /// The instance is held weakly and notifications that arrive after it was dropped are
    /// skipped. Methods take `&self`, since a nested `notify` may call them again while they run.
    pub fn connect_method<Args, I, M, F>(&self, subject: &Subject<Args>, instance: &Rc<I>, method: F) -> HandleId
    where
        Args: 'static,
        I: 'static,
        F: Method<I, Args, M>,
    {
        self.attach(subject, Adapter::method(instance, method))
    }

    /// Forward every notification of `from` into `to`.
    ///
    /// `to` may publish the same values as `from` or any leading prefix of them, in which case
    /// the trailing values are dropped. The relay is an ordinary connection owned by this owner.
    /// It does not keep `to` alive; once `to` is dropped the relay stays connected but does
    /// nothing.
    pub fn connect_relay<From, To>(&self, from: &Subject<From>, to: &Subject<To>) -> HandleId
    where
        From: Leading<To> + 'static,
        To: Arguments,
    {
        self.attach(from, Adapter::relay(to))
    }

    fn attach<Args: 'static>(&self, subject: &Subject<Args>, adapter: Adapter<Args>) -> HandleId {
        let id = self.core.mint();
        let arity = adapter.arity();
        self.core.handles.borrow_mut().insert(id, Handle::new(id, subject.dispatch_list(), adapter));
        subject.register_handle(HandleRef::new(id, Rc::downgrade(&self.core)));
        trace!(handle = %id, arity, "connected");
        id
    }

    /// Remove a connection from its subject and free it.
    ///
    /// Fails with [`ObserverError::ForeignHandle`] if the id was created by another owner, and
    /// with [`ObserverError::StaleHandle`] if the connection no longer exists.
    pub fn disconnect(&self, id: HandleId) -> Result<(), ObserverError> {
        if id.owner() != self.core.id {
            warn!(handle = %id, owner = %self.core.id, "refusing to disconnect a handle of another owner");
            return Err(ObserverError::ForeignHandle { handle: id, owner: self.core.id });
        }

        let Some(handle) = self.core.handles.borrow_mut().remove(&id) else {
            warn!(handle = %id, "disconnect of a stale handle");
            return Err(ObserverError::StaleHandle(id));
        };
        handle.detach_from_subject();
        trace!(handle = %id, "disconnected");
        Ok(())
    }

    /// Whether `id` names a live connection of this owner
    pub fn is_connected(&self, id: HandleId) -> bool { self.core.holds(id) }

    /// Declared arity of the target behind `id`: how many of the subject's values it consumes
    pub fn arity(&self, id: HandleId) -> Option<usize> { self.core.handles.borrow().get(&id).map(Handle::arity) }

    /// Number of live connections
    pub fn len(&self) -> usize { self.core.handles.borrow().len() }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl std::fmt::Debug for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Owner").field("id", &self.core.id).field("handles", &self.core.handles.borrow().len()).finish()
    }
}

impl Drop for Owner {
    fn drop(&mut self) {
        let handles = std::mem::take(&mut *self.core.handles.borrow_mut());
        debug!(owner = %self.core.id, handles = handles.len(), "owner dropped, detaching handles");
        for handle in handles.values() {
            handle.detach_from_subject();
        }
        // Dropped last, with no borrow held: callbacks may own other owners or subjects
        drop(handles);
    }
}
