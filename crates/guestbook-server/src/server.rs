use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use guestbook_store::{Database, EntryRepo};

use crate::config::ServerConfig;
use crate::{page, routes};

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<EntryRepo>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            entries: Arc::new(EntryRepo::new(db)),
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(health_handler))
        .route(
            "/api/entries",
            get(routes::list_entries)
                .post(routes::create_entry)
                .fallback(routes::method_not_allowed),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Create and start the server. Returns a handle that keeps the serve
/// task alive.
pub async fn start(config: ServerConfig, db: Database) -> Result<ServerHandle, std::io::Error> {
    let router = build_router(AppState::new(db));
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(port = local_addr.port(), "guestbook server started");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server_handle,
    })
}

/// Handle returned by `start()`.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

/// Health check HTTP endpoint.
async fn health_handler(State(_state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
