//! Picking API Module
//!
//! Task lifecycle for the authenticated worker plus admin-only reporting,
//! export and dataset reconciliation.

mod handler;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::auth::middleware::require_admin;
use crate::core::ServerState;

/// Picking router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/picking", routes())
}

fn routes() -> Router<ServerState> {
    // Worker routes: any authenticated worker, always acting on self
    let worker_routes = Router::new()
        .route("/", get(handler::list_own).post(handler::start))
        .route("/active", get(handler::active))
        .route("/work", get(handler::available_work))
        .route("/{id}", put(handler::close));

    // Admin routes: reporting, assignment, upload and corrections.
    // Static segments win over the `/{id}` capture when both match.
    let admin_routes = Router::new()
        .route("/all", get(handler::list_all))
        .route("/time", get(handler::time_report))
        .route("/report", get(handler::type_report))
        .route("/subtasks", get(handler::subtask_report))
        .route("/csv", get(handler::csv_export))
        .route("/reports", get(handler::stored_reports))
        .route("/assign", post(handler::assign))
        .route("/upload", post(handler::upload))
        .route("/{id}", get(handler::list_for_worker).delete(handler::remove))
        .layer(middleware::from_fn(require_admin));

    worker_routes.merge(admin_routes)
}
