use crate::signaling::AppState;
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use beacon_core::{ClientEvent, ServerEvent};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let id = state.registry.on_connect(tx);
    info!("New WebSocket connection: {}", id);

    let ready = ServerEvent::Ready {
        id,
        ice_servers: state.ice_servers.as_ref().clone(),
    };
    if let Err(e) = state.registry.send(&id, ready) {
        error!("Could not greet {}: {}", id, e);
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let json = match serde_json::to_string(&event) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {}: {}", event.name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let state = state.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            if let Err(e) = state.hub.client_event(id, event).await {
                                error!("Hub unavailable: {}", e);
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Invalid ClientEvent from {}: {}", id, e);
                            let _ = state.registry.send(
                                &id,
                                ServerEvent::Error {
                                    message: format!("Invalid event: {}", e),
                                },
                            );
                        }
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    state.registry.on_disconnect(&id);
    if let Err(e) = state.hub.disconnect(id).await {
        error!("Could not clean up after {}: {}", id, e);
    }
    info!("WebSocket disconnected: {}", id);
}
