use crate::model::peer::ConnectionId;
use crate::model::room::RoomToken;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(urls: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
            username: None,
            credential: None,
        }
    }
}

/// Events sent by a browser client to the relay.
///
/// Offer and answer payloads are opaque to the relay and travel as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ClientEvent {
    #[serde(rename = "room:create", alias = "room:Create")]
    CreateRoom {
        #[serde(alias = "email")]
        label: String,
    },
    #[serde(rename = "room:join")]
    JoinRoom {
        #[serde(alias = "email")]
        label: String,
        room: RoomToken,
    },
    #[serde(rename = "call:offer", alias = "user:call")]
    CallOffer { to: ConnectionId, offer: Value },
    #[serde(rename = "call:accepted")]
    CallAccepted {
        to: ConnectionId,
        #[serde(alias = "ans")]
        answer: Value,
    },
    #[serde(rename = "peer:renegotiate:needed", alias = "peer:nego:needed")]
    RenegotiateNeeded { to: ConnectionId, offer: Value },
    #[serde(rename = "peer:renegotiate:done", alias = "peer:nego:done")]
    RenegotiateDone {
        to: ConnectionId,
        #[serde(alias = "ans")]
        answer: Value,
    },
    #[serde(rename = "call:end")]
    CallEnd {
        #[serde(default)]
        to: Option<ConnectionId>,
        #[serde(default)]
        room: Option<RoomToken>,
    },
    #[serde(rename = "call:initiated")]
    CallInitiated { to: ConnectionId },
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::CreateRoom { .. } => "room:create",
            ClientEvent::JoinRoom { .. } => "room:join",
            ClientEvent::CallOffer { .. } => "call:offer",
            ClientEvent::CallAccepted { .. } => "call:accepted",
            ClientEvent::RenegotiateNeeded { .. } => "peer:renegotiate:needed",
            ClientEvent::RenegotiateDone { .. } => "peer:renegotiate:done",
            ClientEvent::CallEnd { .. } => "call:end",
            ClientEvent::CallInitiated { .. } => "call:initiated",
        }
    }
}

/// Events pushed by the relay to a browser client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    #[serde(rename = "connection:ready")]
    Ready {
        id: ConnectionId,
        ice_servers: Vec<IceServerConfig>,
    },
    #[serde(rename = "room:joined")]
    RoomJoined { label: String, room: RoomToken },
    #[serde(rename = "room:join:error")]
    RoomJoinError { error: String },
    #[serde(rename = "room:create:error")]
    RoomCreateError { error: String },
    #[serde(rename = "user:joined")]
    UserJoined { label: String, id: ConnectionId },
    #[serde(rename = "user:left")]
    UserLeft {
        label: Option<String>,
        id: ConnectionId,
    },
    #[serde(rename = "incoming:call")]
    IncomingCall { from: ConnectionId, offer: Value },
    #[serde(rename = "call:accepted")]
    CallAccepted { from: ConnectionId, answer: Value },
    #[serde(rename = "peer:renegotiate:needed")]
    RenegotiateNeeded { from: ConnectionId, offer: Value },
    #[serde(rename = "peer:renegotiate:final")]
    RenegotiateFinal { from: ConnectionId, answer: Value },
    #[serde(rename = "call:end")]
    CallEnd { from: ConnectionId },
    #[serde(rename = "call:initiated")]
    CallInitiated { from: ConnectionId },
    #[serde(rename = "delivery:failed")]
    DeliveryFailed { to: ConnectionId, event: String },
    #[serde(rename = "error")]
    Error { message: String },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Ready { .. } => "connection:ready",
            ServerEvent::RoomJoined { .. } => "room:joined",
            ServerEvent::RoomJoinError { .. } => "room:join:error",
            ServerEvent::RoomCreateError { .. } => "room:create:error",
            ServerEvent::UserJoined { .. } => "user:joined",
            ServerEvent::UserLeft { .. } => "user:left",
            ServerEvent::IncomingCall { .. } => "incoming:call",
            ServerEvent::CallAccepted { .. } => "call:accepted",
            ServerEvent::RenegotiateNeeded { .. } => "peer:renegotiate:needed",
            ServerEvent::RenegotiateFinal { .. } => "peer:renegotiate:final",
            ServerEvent::CallEnd { .. } => "call:end",
            ServerEvent::CallInitiated { .. } => "call:initiated",
            ServerEvent::DeliveryFailed { .. } => "delivery:failed",
            ServerEvent::Error { .. } => "error",
        }
    }

    /// Sender identity carried by forwarded signaling events.
    pub fn sender(&self) -> Option<ConnectionId> {
        match self {
            ServerEvent::IncomingCall { from, .. }
            | ServerEvent::CallAccepted { from, .. }
            | ServerEvent::RenegotiateNeeded { from, .. }
            | ServerEvent::RenegotiateFinal { from, .. }
            | ServerEvent::CallEnd { from }
            | ServerEvent::CallInitiated { from } => Some(*from),
            _ => None,
        }
    }
}
