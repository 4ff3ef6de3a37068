mod session_relay;

pub use session_relay::*;
