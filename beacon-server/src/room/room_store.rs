use crate::RelayError;
use beacon_core::{ConnectionId, RoomToken};
use std::collections::{HashMap, HashSet};

/// Active rooms and their members, plus the reverse connection -> rooms index.
#[derive(Debug, Default)]
pub struct RoomStore {
    rooms: HashMap<RoomToken, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<RoomToken>>,
}

impl RoomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, token: &RoomToken) -> bool {
        self.rooms.contains_key(token)
    }

    /// Activates an empty room. Returns `false` if the token is already active.
    pub fn activate(&mut self, token: RoomToken) -> bool {
        if self.rooms.contains_key(&token) {
            return false;
        }
        self.rooms.insert(token, HashSet::new());
        true
    }

    /// Adds `id` to an active room and returns the new member count.
    pub fn add_member(&mut self, token: &RoomToken, id: ConnectionId) -> Result<usize, RelayError> {
        let members = self
            .rooms
            .get_mut(token)
            .ok_or_else(|| RelayError::RoomNotFound(token.clone()))?;
        members.insert(id);
        self.memberships.entry(id).or_default().insert(token.clone());
        Ok(members.len())
    }

    /// Removes `id` from the room and returns the member count after removal.
    ///
    /// `None` if the room is not active or `id` was not a member.
    pub fn remove_member(&mut self, token: &RoomToken, id: &ConnectionId) -> Option<usize> {
        let members = self.rooms.get_mut(token)?;
        if !members.remove(id) {
            return None;
        }

        if let Some(rooms) = self.memberships.get_mut(id) {
            rooms.remove(token);
            if rooms.is_empty() {
                self.memberships.remove(id);
            }
        }

        Some(members.len())
    }

    /// Drops the room; its token becomes free for reuse.
    pub fn retire(&mut self, token: &RoomToken) -> bool {
        let Some(members) = self.rooms.remove(token) else {
            return false;
        };

        for id in members {
            if let Some(rooms) = self.memberships.get_mut(&id) {
                rooms.remove(token);
                if rooms.is_empty() {
                    self.memberships.remove(&id);
                }
            }
        }
        true
    }

    pub fn members(&self, token: &RoomToken) -> Vec<ConnectionId> {
        self.rooms
            .get(token)
            .map(|m| m.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn member_count(&self, token: &RoomToken) -> usize {
        self.rooms.get(token).map_or(0, HashSet::len)
    }

    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomToken> {
        self.memberships
            .get(id)
            .map(|r| r.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn active_tokens(&self) -> Vec<RoomToken> {
        self.rooms.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn total_members(&self) -> usize {
        self.rooms.values().map(HashSet::len).sum()
    }
}
