use crate::RelayError;
use crate::config::RelayConfig;
use crate::hub::HubCommand;
use crate::room::{RoomLifecycleManager, RoomStats};
use crate::signaling::SignalingOutput;
use beacon_core::{ClientEvent, ConnectionId};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Single event loop owning all room state.
///
/// Commands are applied one at a time in arrival order.
pub struct SignalingHub {
    manager: RoomLifecycleManager,
    command_rx: mpsc::Receiver<HubCommand>,
}

impl SignalingHub {
    pub fn new(manager: RoomLifecycleManager, command_rx: mpsc::Receiver<HubCommand>) -> Self {
        Self {
            manager,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Signaling hub started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Signaling hub stopped.");
    }

    async fn handle_command(&mut self, cmd: HubCommand) {
        match cmd {
            HubCommand::Client { from, event } => {
                self.manager.handle_event(from, event).await;
            }

            HubCommand::Disconnect { id } => {
                self.manager.on_disconnect(id).await;
            }

            HubCommand::Stats { reply } => {
                if reply.send(self.manager.stats()).is_err() {
                    warn!("Stats requester went away");
                }
            }
        }
    }
}

/// Cloneable handle for submitting commands to a running hub.
#[derive(Clone)]
pub struct RelayHandle {
    command_tx: mpsc::Sender<HubCommand>,
}

impl RelayHandle {
    pub fn new(command_tx: mpsc::Sender<HubCommand>) -> Self {
        Self { command_tx }
    }

    pub async fn submit(&self, cmd: HubCommand) -> Result<(), RelayError> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| RelayError::HubClosed)
    }

    pub async fn client_event(
        &self,
        from: ConnectionId,
        event: ClientEvent,
    ) -> Result<(), RelayError> {
        self.submit(HubCommand::Client { from, event }).await
    }

    pub async fn disconnect(&self, id: ConnectionId) -> Result<(), RelayError> {
        self.submit(HubCommand::Disconnect { id }).await
    }

    pub async fn stats(&self) -> Result<RoomStats, RelayError> {
        let (reply, rx) = oneshot::channel();
        self.submit(HubCommand::Stats { reply }).await?;
        rx.await.map_err(|_| RelayError::HubClosed)
    }
}

/// Starts a hub on the current tokio runtime.
pub fn spawn_hub(config: &RelayConfig, output: Arc<dyn SignalingOutput>) -> RelayHandle {
    spawn_with_manager(config, RoomLifecycleManager::new(config, output))
}

/// Starts a hub around an already-built manager.
pub fn spawn_with_manager(config: &RelayConfig, manager: RoomLifecycleManager) -> RelayHandle {
    let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
    let hub = SignalingHub::new(manager, command_rx);
    tokio::spawn(hub.run());
    RelayHandle::new(command_tx)
}
