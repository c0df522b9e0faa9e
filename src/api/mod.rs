//! HTTP boundary used by the front-end player

mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Json, Router};
use reqwest::Client;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::bandlab::BandlabClient;
use crate::config::Config;
use crate::relay::Relay;

pub static MODULE_NAME: &str = "song-resolver";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bandlab: Arc<BandlabClient>,
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            bandlab: Arc::new(BandlabClient::new(config, http.clone())),
            relay: Arc::new(Relay::new(config, http)),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest(
            "/api",
            Router::new()
                .route("/resolve-bandlab", get(handlers::resolve_bandlab))
                .route("/stream-audio", get(handlers::stream_audio))
                .route("/embed", get(handlers::embed))
                .route("/import", post(handlers::import))
                .route("/vote", post(handlers::vote))
                .route("/status", post(handlers::status)),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}
