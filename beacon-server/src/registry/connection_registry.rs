use crate::RelayError;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use beacon_core::{ConnectionId, ServerEvent};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

struct RegistryInner {
    peers: DashMap<ConnectionId, mpsc::UnboundedSender<ServerEvent>>,
}

/// Live client connections and the outbound channel of each.
///
/// Shared between socket tasks (register/unregister) and the hub (delivery).
#[derive(Clone)]
pub struct ConnectionRegistry {
    inner: Arc<RegistryInner>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                peers: DashMap::new(),
            }),
        }
    }

    /// Registers a freshly opened transport and hands back its identity.
    pub fn on_connect(&self, tx: mpsc::UnboundedSender<ServerEvent>) -> ConnectionId {
        let id = ConnectionId::new();
        self.inner.peers.insert(id, tx);
        info!("Connection {} registered", id);
        id
    }

    /// Drops the identity from the live set. Room and directory cleanup is the hub's job.
    pub fn on_disconnect(&self, id: &ConnectionId) -> bool {
        let removed = self.inner.peers.remove(id).is_some();
        if removed {
            info!("Connection {} unregistered", id);
        }
        removed
    }

    pub fn is_live(&self, id: &ConnectionId) -> bool {
        self.inner.peers.contains_key(id)
    }

    pub fn live_count(&self) -> usize {
        self.inner.peers.len()
    }

    pub fn send(&self, id: &ConnectionId, event: ServerEvent) -> Result<(), RelayError> {
        let Some(peer) = self.inner.peers.get(id) else {
            warn!(
                "Attempted to send {} to disconnected connection {}",
                event.name(),
                id
            );
            return Err(RelayError::StaleTarget(*id));
        };

        debug!("Sending {} to {}", event.name(), id);
        peer.send(event).map_err(|e| {
            warn!("Outbound channel of {} is closed: {}", id, e);
            RelayError::StaleTarget(*id)
        })
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignalingOutput for ConnectionRegistry {
    async fn deliver(&self, to: ConnectionId, event: ServerEvent) -> Result<(), RelayError> {
        self.send(&to, event)
    }
}
