use crate::RelayError;
use async_trait::async_trait;
use beacon_core::{ConnectionId, ServerEvent};

/// Outbound side of the relay: pushes an event onto one client's channel.
///
/// Implemented by [`crate::ConnectionRegistry`] for live sockets and by test doubles.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `event` to `to`. Fails with [`RelayError::StaleTarget`] if `to` is not live.
    async fn deliver(&self, to: ConnectionId, event: ServerEvent) -> Result<(), RelayError>;
}
