//! HTTP surface of the forecast service.

pub mod response;
pub mod routes;

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::Method;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::Forecaster;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub forecaster: Forecaster,
}

/// Builds the router with tracing and CORS middleware.
pub fn router(forecaster: Forecaster) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/forecast", get(routes::forecast))
        .route("/api/zip-codes", get(routes::zip_codes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(AppState { forecaster })
}

/// Serves on `addr` until Ctrl+C.
pub async fn serve(addr: SocketAddr, forecaster: Forecaster) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;

    info!(%addr, version = env!("CARGO_PKG_VERSION"), "Forecast server listening");

    axum::serve(listener, router(forecaster))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Forecast server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
