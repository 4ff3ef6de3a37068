use beacon_core::ConnectionId;
use std::collections::HashMap;
use tracing::debug;

/// Label <-> connection lookup for the lifetime of a call.
///
/// Auxiliary only: room membership never consults it.
#[derive(Debug, Default)]
pub struct IdentityDirectory {
    by_label: HashMap<String, ConnectionId>,
    by_connection: HashMap<ConnectionId, String>,
}

impl IdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last write wins on both keys. Displaced entries are dropped from both maps.
    pub fn bind(&mut self, label: impl Into<String>, id: ConnectionId) {
        let label = label.into();

        if let Some(old_label) = self.by_connection.remove(&id) {
            if self.by_label.get(&old_label) == Some(&id) {
                self.by_label.remove(&old_label);
            }
        }

        if let Some(old_id) = self.by_label.insert(label.clone(), id) {
            if old_id != id {
                debug!("Label '{}' moved from {} to {}", label, old_id, id);
                self.by_connection.remove(&old_id);
            }
        }

        self.by_connection.insert(id, label);
    }

    pub fn unbind(&mut self, id: &ConnectionId) -> Option<String> {
        let label = self.by_connection.remove(id)?;
        if self.by_label.get(&label) == Some(id) {
            self.by_label.remove(&label);
        }
        Some(label)
    }

    pub fn label_of(&self, id: &ConnectionId) -> Option<&str> {
        self.by_connection.get(id).map(String::as_str)
    }

    pub fn connection_of(&self, label: &str) -> Option<ConnectionId> {
        self.by_label.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.by_connection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_connection.is_empty()
    }
}
