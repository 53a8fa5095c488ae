//! Worker API Module

mod handler;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::middleware::require_admin;
use crate::core::ServerState;

/// Worker router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/worker", routes())
}

fn routes() -> Router<ServerState> {
    // Public routes: skipped by the auth middleware by path
    let public_routes = Router::new()
        .route("/login", post(handler::login))
        .route("/token_validation", get(handler::token_validation));

    // Management routes: admin only
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/external/{external_id}", get(handler::get_by_external_id))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .layer(middleware::from_fn(require_admin));

    public_routes.merge(manage_routes)
}
