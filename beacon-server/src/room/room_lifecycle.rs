use crate::RelayError;
use crate::config::RelayConfig;
use crate::directory::IdentityDirectory;
use crate::relay::{SessionRelay, SignalKind};
use crate::room::RoomStore;
use crate::signaling::SignalingOutput;
use beacon_core::{ClientEvent, ConnectionId, RoomToken, ServerEvent};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

type TokenSource = Box<dyn FnMut() -> RoomToken + Send + Sync>;

/// Snapshot counters of relay state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomStats {
    pub active_rooms: usize,
    pub members: usize,
    pub labels: usize,
}

/// Owns room and directory state and applies client events to it.
///
/// Every public operation mutates state synchronously before it sends anything,
/// so a caller that runs one operation at a time never exposes a half-applied update.
pub struct RoomLifecycleManager {
    store: RoomStore,
    directory: IdentityDirectory,
    relay: SessionRelay,
    token_source: TokenSource,
    max_token_attempts: usize,
    notify_delivery_failure: bool,
    single_room_per_connection: bool,
}

impl RoomLifecycleManager {
    pub fn new(config: &RelayConfig, output: Arc<dyn SignalingOutput>) -> Self {
        let token_length = config.token_length;
        Self::with_token_source(config, output, move || RoomToken::generate(token_length))
    }

    pub fn with_token_source<F>(
        config: &RelayConfig,
        output: Arc<dyn SignalingOutput>,
        token_source: F,
    ) -> Self
    where
        F: FnMut() -> RoomToken + Send + Sync + 'static,
    {
        Self {
            store: RoomStore::new(),
            directory: IdentityDirectory::new(),
            relay: SessionRelay::new(output),
            token_source: Box::new(token_source),
            max_token_attempts: config.max_token_attempts,
            notify_delivery_failure: config.notify_delivery_failure,
            single_room_per_connection: config.single_room_per_connection,
        }
    }

    pub async fn handle_event(&mut self, from: ConnectionId, event: ClientEvent) {
        debug!("Handling {} from {}", event.name(), from);

        match event {
            ClientEvent::CreateRoom { label } => {
                if let Err(e) = self.create_room(from, label).await {
                    debug!("room:create from {} failed: {}", from, e);
                }
            }
            ClientEvent::JoinRoom { label, room } => {
                if let Err(e) = self.join_room(from, label, room).await {
                    debug!("room:join from {} failed: {}", from, e);
                }
            }
            ClientEvent::CallOffer { to, offer } => {
                self.relay_signal(SignalKind::Offer, from, to, offer).await
            }
            ClientEvent::CallAccepted { to, answer } => {
                self.relay_signal(SignalKind::Answer, from, to, answer).await
            }
            ClientEvent::RenegotiateNeeded { to, offer } => {
                self.relay_signal(SignalKind::RenegotiateOffer, from, to, offer)
                    .await
            }
            ClientEvent::RenegotiateDone { to, answer } => {
                self.relay_signal(SignalKind::RenegotiateAnswer, from, to, answer)
                    .await
            }
            ClientEvent::CallEnd { to, room } => {
                self.end_call(from, to, room).await;
            }
            ClientEvent::CallInitiated { to } => {
                self.relay_signal(SignalKind::CallInitiated, from, to, Value::Null)
                    .await
            }
        }
    }

    /// Opens a room under a fresh token with `requester` as its first member.
    pub async fn create_room(
        &mut self,
        requester: ConnectionId,
        label: String,
    ) -> Result<RoomToken, RelayError> {
        let token = match self.try_create_room(requester, &label) {
            Ok(token) => token,
            Err(e) => {
                warn!("Room creation for {} rejected: {}", requester, e);
                self.reply(requester, ServerEvent::RoomCreateError {
                    error: e.to_string(),
                })
                .await;
                return Err(e);
            }
        };

        self.announce_join(requester, label, token.clone()).await;
        Ok(token)
    }

    /// Adds `requester` to an active room. Unknown tokens leave state untouched.
    pub async fn join_room(
        &mut self,
        requester: ConnectionId,
        label: String,
        token: RoomToken,
    ) -> Result<(), RelayError> {
        if let Err(e) = self.try_join_room(requester, &label, &token) {
            warn!("Join of {} to room '{}' rejected: {}", requester, token, e);
            self.reply(requester, ServerEvent::RoomJoinError {
                error: e.to_string(),
            })
            .await;
            return Err(e);
        }

        self.announce_join(requester, label, token).await;
        Ok(())
    }

    /// Ends `requester`'s call: notifies `target`, drops the label binding and the
    /// membership, and retires every room left empty. Returns the retired tokens.
    ///
    /// Without a token, every room the requester belongs to is left.
    pub async fn end_call(
        &mut self,
        requester: ConnectionId,
        target: Option<ConnectionId>,
        token: Option<RoomToken>,
    ) -> Vec<RoomToken> {
        if let Some(to) = target.filter(|to| *to != requester) {
            self.relay_signal(SignalKind::CallEnd, requester, to, Value::Null)
                .await;
        }

        if let Some(label) = self.directory.unbind(&requester) {
            debug!("Unbound '{}' from {}", label, requester);
        }

        let rooms = match token {
            Some(token) => vec![token],
            None => self.store.rooms_of(&requester),
        };

        let mut retired = Vec::new();
        for token in rooms {
            match self.leave_room(&token, requester) {
                Some(0) => retired.push(token),
                Some(_) => {}
                None => debug!("{} ended a call in room '{}' it is not part of", requester, token),
            }
        }
        retired
    }

    /// Same cleanup as [`Self::end_call`] for a transport that went away, plus a
    /// `user:left` notice to whoever is still in the affected rooms.
    pub async fn on_disconnect(&mut self, id: ConnectionId) -> Vec<RoomToken> {
        let label = self.directory.unbind(&id);

        let mut retired = Vec::new();
        for token in self.store.rooms_of(&id) {
            match self.leave_room(&token, id) {
                Some(0) => retired.push(token),
                Some(_) => {
                    let members = self.store.members(&token);
                    let event = ServerEvent::UserLeft {
                        label: label.clone(),
                        id,
                    };
                    self.relay.broadcast_to_room(&members, event).await;
                }
                None => {}
            }
        }

        info!("Cleaned up after {} ({} rooms retired)", id, retired.len());
        retired
    }

    pub fn is_active(&self, token: &RoomToken) -> bool {
        self.store.is_active(token)
    }

    pub fn members(&self, token: &RoomToken) -> Vec<ConnectionId> {
        self.store.members(token)
    }

    pub fn member_count(&self, token: &RoomToken) -> usize {
        self.store.member_count(token)
    }

    pub fn rooms_of(&self, id: &ConnectionId) -> Vec<RoomToken> {
        self.store.rooms_of(id)
    }

    pub fn label_of(&self, id: &ConnectionId) -> Option<&str> {
        self.directory.label_of(id)
    }

    pub fn connection_of(&self, label: &str) -> Option<ConnectionId> {
        self.directory.connection_of(label)
    }

    pub fn stats(&self) -> RoomStats {
        RoomStats {
            active_rooms: self.store.len(),
            members: self.store.total_members(),
            labels: self.directory.len(),
        }
    }

    fn try_create_room(
        &mut self,
        requester: ConnectionId,
        label: &str,
    ) -> Result<RoomToken, RelayError> {
        self.ensure_free(requester, None)?;

        let token = self.allocate_token()?;
        self.store.activate(token.clone());
        self.store.add_member(&token, requester)?;
        self.directory.bind(label, requester);

        info!("Room '{}' created by {}", token, requester);
        Ok(token)
    }

    fn try_join_room(
        &mut self,
        requester: ConnectionId,
        label: &str,
        token: &RoomToken,
    ) -> Result<(), RelayError> {
        if !self.store.is_active(token) {
            return Err(RelayError::RoomNotFound(token.clone()));
        }
        self.ensure_free(requester, Some(token))?;

        let size = self.store.add_member(token, requester)?;
        self.directory.bind(label, requester);

        info!("{} joined room '{}' ({} members)", requester, token, size);
        Ok(())
    }

    fn allocate_token(&mut self) -> Result<RoomToken, RelayError> {
        for attempt in 1..=self.max_token_attempts {
            let token = (self.token_source)();
            if !self.store.is_active(&token) {
                return Ok(token);
            }
            debug!("Token '{}' is taken (attempt {})", token, attempt);
        }

        Err(RelayError::TokenSpaceExhausted {
            attempts: self.max_token_attempts,
        })
    }

    fn ensure_free(
        &self,
        requester: ConnectionId,
        joining: Option<&RoomToken>,
    ) -> Result<(), RelayError> {
        if !self.single_room_per_connection {
            return Ok(());
        }

        match self
            .store
            .rooms_of(&requester)
            .into_iter()
            .find(|t| Some(t) != joining)
        {
            Some(current) => Err(RelayError::AlreadyInRoom(current)),
            None => Ok(()),
        }
    }

    /// Removes `id` and retires the room if that left it empty.
    ///
    /// The retirement check uses the member count after removal.
    fn leave_room(&mut self, token: &RoomToken, id: ConnectionId) -> Option<usize> {
        let remaining = self.store.remove_member(token, &id)?;

        if remaining == 0 {
            self.store.retire(token);
            info!("Room '{}' is empty and has been retired", token);
        } else {
            debug!("{} left room '{}' ({} remaining)", id, token, remaining);
        }
        Some(remaining)
    }

    async fn announce_join(&self, requester: ConnectionId, label: String, token: RoomToken) {
        let members = self.store.members(&token);
        let joined = ServerEvent::UserJoined {
            label: label.clone(),
            id: requester,
        };
        self.relay.broadcast_to_room(&members, joined).await;

        self.reply(requester, ServerEvent::RoomJoined { label, room: token })
            .await;
    }

    async fn relay_signal(
        &self,
        kind: SignalKind,
        from: ConnectionId,
        to: ConnectionId,
        payload: Value,
    ) {
        let Err(e) = self.relay.forward(kind, from, to, payload).await else {
            return;
        };
        warn!("Dropped {} from {}: {}", kind.event_name(), from, e);

        if self.notify_delivery_failure {
            self.reply(from, ServerEvent::DeliveryFailed {
                to,
                event: kind.event_name().to_string(),
            })
            .await;
        }
    }

    async fn reply(&self, to: ConnectionId, event: ServerEvent) {
        if let Err(e) = self.relay.notify(to, event).await {
            debug!("Could not reply to {}: {}", to, e);
        }
    }
}
