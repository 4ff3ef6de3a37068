use crate::room::RoomStats;
use beacon_core::{ClientEvent, ConnectionId};
use tokio::sync::oneshot;

/// Commands the WebSocket layer hands to the signaling hub.
#[derive(Debug)]
pub enum HubCommand {
    /// Decoded event from a client socket.
    Client {
        from: ConnectionId,
        event: ClientEvent,
    },

    /// Transport closed, gracefully or not.
    Disconnect { id: ConnectionId },

    /// Request for current state counters.
    Stats { reply: oneshot::Sender<RoomStats> },
}
