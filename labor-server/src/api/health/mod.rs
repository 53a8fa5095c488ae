//! Health check route
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /health | GET | none |

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::core::ServerState;

/// Health router - public (no authentication)
pub fn router() -> Router<ServerState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}
