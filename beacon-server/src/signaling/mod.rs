mod router;
mod signaling_output;
mod ws_handler;

pub use router::*;
pub use signaling_output::*;
pub use ws_handler::*;
