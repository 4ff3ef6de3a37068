use beacon_core::{DEFAULT_TOKEN_LENGTH, IceServerConfig};
use std::net::SocketAddr;

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP/WebSocket listener binds to.
    pub bind_addr: SocketAddr,

    /// Number of characters in a generated room token.
    pub token_length: usize,

    /// How many fresh tokens to draw before giving up on a collision streak.
    pub max_token_attempts: usize,

    /// Tell the sender with `delivery:failed` when a forward hits a dead connection.
    pub notify_delivery_failure: bool,

    /// Reject create/join from a connection that is already in a room.
    pub single_room_per_connection: bool,

    /// Capacity of the hub command queue.
    pub command_buffer: usize,

    /// ICE servers announced to every client on connect.
    pub ice_servers: Vec<IceServerConfig>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            token_length: DEFAULT_TOKEN_LENGTH,
            max_token_attempts: 32,
            notify_delivery_failure: true,
            single_room_per_connection: false,
            command_buffer: 256,
            ice_servers: vec![IceServerConfig::stun([
                "stun:stun.l.google.com:19302",
                "stun:global.stun.twilio.com:3478",
            ])],
        }
    }
}

impl RelayConfig {
    pub fn with_bind_addr(mut self, bind_addr: SocketAddr) -> Self {
        self.bind_addr = bind_addr;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.token_length > 0, "token length must be at least 1");
        anyhow::ensure!(
            self.max_token_attempts > 0,
            "max token attempts must be at least 1"
        );
        anyhow::ensure!(self.command_buffer > 0, "command buffer must be at least 1");
        Ok(())
    }
}
