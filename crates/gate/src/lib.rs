// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Stayline Ltd

//! Staygate: role-gated edge proxy for the Stayline marketplace web app.

pub mod config;
pub mod error;
pub mod layer;
pub mod proxy;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::middleware;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use crate::config::GateConfig;
use crate::state::GateState;

/// Build the axum `Router`: local health endpoint, everything else gated and
/// proxied upstream.
pub fn build_router(state: Arc<GateState>) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .fallback(proxy::proxy_handler)
        .layer(middleware::from_fn_with_state(state.clone(), layer::gate_layer))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Run the gate until shutdown.
pub async fn run(config: GateConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let shutdown = CancellationToken::new();

    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown.cancel();
        });
    }

    let state = Arc::new(GateState::new(config));
    let router = build_router(Arc::clone(&state));

    tracing::info!("staygate listening on {addr} (upstream {})", state.config.upstream_url);
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown.cancelled_owned()).await?;

    Ok(())
}
