pub mod connection_tests;
pub mod room_tests;

use std::sync::Arc;
use tracing::Level;

use beacon_core::RoomToken;
use beacon_server::{RelayConfig, RoomLifecycleManager};

use crate::utils::MockSignalingOutput;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_manager(config: RelayConfig) -> (RoomLifecycleManager, MockSignalingOutput) {
    let output = MockSignalingOutput::new();
    let manager = RoomLifecycleManager::new(&config, Arc::new(output.clone()));
    (manager, output)
}

pub fn create_manager_with_tokens<F>(
    config: RelayConfig,
    tokens: F,
) -> (RoomLifecycleManager, MockSignalingOutput)
where
    F: FnMut() -> RoomToken + Send + Sync + 'static,
{
    let output = MockSignalingOutput::new();
    let manager = RoomLifecycleManager::with_token_source(&config, Arc::new(output.clone()), tokens);
    (manager, output)
}
