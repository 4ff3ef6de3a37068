mod config;
mod directory;
mod error;
mod hub;
mod registry;
mod relay;
mod room;
mod signaling;

pub use config::*;
pub use directory::*;
pub use error::*;
pub use hub::*;
pub use registry::*;
pub use relay::*;
pub use room::*;
pub use signaling::*;
