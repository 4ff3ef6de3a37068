use crate::RelayError;
use crate::signaling::SignalingOutput;
use beacon_core::{ConnectionId, ServerEvent};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Point-to-point signaling kinds the relay forwards without looking inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Offer,
    Answer,
    RenegotiateOffer,
    RenegotiateAnswer,
    CallEnd,
    CallInitiated,
}

impl SignalKind {
    /// Name of the outbound event the recipient receives.
    pub fn event_name(self) -> &'static str {
        match self {
            SignalKind::Offer => "incoming:call",
            SignalKind::Answer => "call:accepted",
            SignalKind::RenegotiateOffer => "peer:renegotiate:needed",
            SignalKind::RenegotiateAnswer => "peer:renegotiate:final",
            SignalKind::CallEnd => "call:end",
            SignalKind::CallInitiated => "call:initiated",
        }
    }

    /// Wraps `payload` into the outbound event the recipient sees.
    ///
    /// `CallEnd` and `CallInitiated` carry no payload.
    pub fn into_event(self, from: ConnectionId, payload: Value) -> ServerEvent {
        match self {
            SignalKind::Offer => ServerEvent::IncomingCall {
                from,
                offer: payload,
            },
            SignalKind::Answer => ServerEvent::CallAccepted {
                from,
                answer: payload,
            },
            SignalKind::RenegotiateOffer => ServerEvent::RenegotiateNeeded {
                from,
                offer: payload,
            },
            SignalKind::RenegotiateAnswer => ServerEvent::RenegotiateFinal {
                from,
                answer: payload,
            },
            SignalKind::CallEnd => ServerEvent::CallEnd { from },
            SignalKind::CallInitiated => ServerEvent::CallInitiated { from },
        }
    }
}

/// Stateless forwarding over a [`SignalingOutput`].
#[derive(Clone)]
pub struct SessionRelay {
    output: Arc<dyn SignalingOutput>,
}

impl SessionRelay {
    pub fn new(output: Arc<dyn SignalingOutput>) -> Self {
        Self { output }
    }

    /// Delivers `payload` to `to` only, tagged with `from`.
    pub async fn forward(
        &self,
        kind: SignalKind,
        from: ConnectionId,
        to: ConnectionId,
        payload: Value,
    ) -> Result<(), RelayError> {
        let event = kind.into_event(from, payload);
        debug!("Forwarding {} from {} to {}", event.name(), from, to);
        self.output.deliver(to, event).await
    }

    /// Sends a direct (non-forwarded) event such as an ack or an error.
    pub async fn notify(&self, to: ConnectionId, event: ServerEvent) -> Result<(), RelayError> {
        self.output.deliver(to, event).await
    }

    /// Sends `event` to every member. Returns how many deliveries succeeded.
    pub async fn broadcast_to_room(&self, members: &[ConnectionId], event: ServerEvent) -> usize {
        let mut delivered = 0;
        for member in members {
            match self.output.deliver(*member, event.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!("Broadcast of {} skipped {}: {}", event.name(), member, e),
            }
        }
        delivered
    }
}
