use thiserror::Error;

use crate::handle::{HandleId, OwnerId};

/// Errors from explicitly managing connections.
///
/// Teardown never fails; only [`Owner::disconnect`](crate::Owner::disconnect) reports errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ObserverError {
    /// The connection was already disconnected, or released because its subject was dropped
    #[error("handle {0} is not connected")]
    StaleHandle(HandleId),

    /// The handle was created through a different owner
    #[error("handle {handle} does not belong to owner {owner}")]
    ForeignHandle { handle: HandleId, owner: OwnerId },
}
