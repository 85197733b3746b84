//! Relay HTTP server.
//!
//! One router, two routes: the vision relay endpoint and a health probe.
//! No state is shared across requests beyond the analyzer itself.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use scanlens_analysis::ScanAnalyzer;

use crate::{health_api, vision_api};

/// Application state shared across routes.
#[derive(Clone)]
pub struct GatewayState {
    pub analyzer: Arc<ScanAnalyzer>,
}

/// Build the relay router.
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/vision", post(vision_api::analyze_scan))
        .route("/api/health", get(health_api::get_health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the relay HTTP server.
pub async fn start_server(addr: SocketAddr, state: GatewayState) -> Result<()> {
    let app = build_router(state);

    info!("Relay HTTP server listening on {}", addr);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
