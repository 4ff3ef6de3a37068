use crate::config::RelayConfig;
use crate::hub::{RelayHandle, spawn_hub};
use crate::registry::ConnectionRegistry;
use crate::signaling::ws_handler;
use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::{Router, routing::get};
use beacon_core::IceServerConfig;
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

/// Shared state behind every route.
#[derive(Clone)]
pub struct AppState {
    pub registry: ConnectionRegistry,
    pub hub: RelayHandle,
    pub ice_servers: Arc<Vec<IceServerConfig>>,
}

impl AppState {
    /// Builds a registry and starts a hub delivering through it.
    pub fn new(config: &RelayConfig) -> Self {
        let registry = ConnectionRegistry::new();
        let hub = spawn_hub(config, Arc::new(registry.clone()));

        Self {
            registry,
            hub,
            ice_servers: Arc::new(config.ice_servers.clone()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/ws", get(ws_handler))
        .route("/stats", get(stats))
        .layer(cors)
        .with_state(state)
}

/// Binds `config.bind_addr` and serves until Ctrl-C.
pub async fn serve(config: RelayConfig) -> anyhow::Result<()> {
    config.validate()?;

    let state = AppState::new(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Signaling relay listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Signaling relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn index() -> &'static str {
    "Beacon signaling relay"
}

async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    match state.hub.stats().await {
        Ok(rooms) => (
            StatusCode::OK,
            Json(json!({
                "live_connections": state.registry.live_count(),
                "active_rooms": rooms.active_rooms,
                "members": rooms.members,
                "labels": rooms.labels,
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": e.to_string() })),
        ),
    }
}
