//! HTTP API module - generation proxy endpoints

mod error;
mod generate;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, extract::State, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::openrouter::OpenRouterClient;
use crate::Config;
pub use error::{ApiError, ErrorResponse, PAYLOAD_TOO_LARGE_MESSAGE};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<OpenRouterClient>,
}

/// Build the API router
pub fn router(config: &Config, provider: Arc<OpenRouterClient>) -> Router {
    let state = AppState { provider };

    let router = Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(generate::router())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if config.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "floorviz",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        provider: if state.provider.is_configured() {
            "configured"
        } else {
            "missing"
        },
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
}
