mod peer;
mod room;
mod signaling;

pub use peer::ConnectionId;
pub use room::{DEFAULT_TOKEN_LENGTH, RoomToken};
pub use signaling::{ClientEvent, IceServerConfig, ServerEvent};
