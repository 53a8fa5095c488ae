//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness check
//! - [`worker`] - authentication and worker management
//! - [`picking`] - task lifecycle, reporting and dataset reconciliation

pub mod health;
pub mod picking;
pub mod worker;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::middleware::require_auth;
use crate::core::ServerState;

/// Assemble the full application router
///
/// Authentication applies globally; the middleware itself skips the
/// public routes (login, token validation, health).
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(worker::router())
        .merge(picking::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
