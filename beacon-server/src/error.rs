use beacon_core::{ConnectionId, RoomToken};
use thiserror::Error;

/// Failures surfaced at the relay boundary. None of them are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    /// Join against a token that was never issued or has been retired.
    #[error("Room does not exist")]
    RoomNotFound(RoomToken),

    /// Target connection is gone.
    #[error("Connection {0} is no longer connected")]
    StaleTarget(ConnectionId),

    #[error("Already in a room")]
    AlreadyInRoom(RoomToken),

    #[error("No free room token after {attempts} attempts")]
    TokenSpaceExhausted { attempts: usize },

    #[error("Signaling hub is not running")]
    HubClosed,
}
