//! HTTP layer exposing the analyze and download endpoints.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;

use crate::{config::Settings, narrative::CompletionClient};

/// Per-process state shared by every request; never mutated after startup.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub client: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(settings: Settings, client: Arc<dyn CompletionClient>) -> Self {
        Self { settings, client }
    }
}

/// Build the router; browser clients on any origin may call it. The upload
/// limit applies to `/analyze` only.
pub fn router(state: AppState) -> Router {
    let body_limit = state.settings.max_upload_bytes;
    let static_dir = state.settings.static_dir.clone();

    let router = Router::new()
        .route(
            "/analyze",
            post(routes::analyze).layer(DefaultBodyLimit::max(body_limit)),
        )
        .route("/download", post(routes::download));
    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: String, port: u16) -> Result<()> {
    let router = router(state);
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving lyon-stories API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
