mod room_lifecycle;
mod room_store;

pub use room_lifecycle::*;
pub use room_store::*;
