//! Worker API Handlers

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};

use crate::auth::{password, JwtService};
use crate::core::ServerState;
use crate::db::repository;
use crate::utils::validation::{
    validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_PASSWORD_LEN,
    MAX_SHORT_TEXT_LEN,
};
use shared::models::{
    LoginRequest, LoginResponse, TokenValidation, WorkerCreate, WorkerResponse, WorkerUpdate,
};
use shared::{AppError, AppResult};

/// POST /worker/login
///
/// Unknown name and wrong password return the same rejection; the
/// response never reveals which half failed.
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    let worker = repository::worker::find_by_name(&state.pool, &payload.name)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    let valid = password::verify_password(&payload.password, &worker.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        tracing::warn!(target: "security", name = %payload.name, "Login rejected");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .get_jwt_service()
        .generate_token(worker.id, &worker.name, worker.admin)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(worker_id = worker.id, name = %worker.name, "Login succeeded");
    Ok(Json(LoginResponse {
        token,
        user: worker.into(),
    }))
}

/// GET /worker/token_validation
///
/// Always 200; the body says whether the presented token is valid.
pub async fn token_validation(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> Json<TokenValidation> {
    let is_valid = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .map(|token| state.get_jwt_service().validate_token(token).is_ok())
        .unwrap_or(false);

    Json(TokenValidation { is_valid })
}

/// GET /worker
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<WorkerResponse>>> {
    let workers = repository::worker::find_all(&state.pool)
        .await
        .map_err(AppError::from)?;
    Ok(Json(workers.into_iter().map(Into::into).collect()))
}

/// GET /worker/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<WorkerResponse>> {
    let worker = repository::worker::find_by_id(&state.pool, id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::not_found(format!("Worker {id} not found")))?;
    Ok(Json(worker.into()))
}

/// GET /worker/external/{external_id}
pub async fn get_by_external_id(
    State(state): State<ServerState>,
    Path(external_id): Path<String>,
) -> AppResult<Json<WorkerResponse>> {
    let worker = repository::worker::find_by_external_id(&state.pool, &external_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::not_found(format!("Worker with external id {external_id} not found"))
        })?;
    Ok(Json(worker.into()))
}

/// POST /worker
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<WorkerCreate>,
) -> AppResult<Json<WorkerResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    validate_required_text(&payload.soft_one_id, "soft_one_id", MAX_SHORT_TEXT_LEN)?;

    let worker = repository::worker::create(&state.pool, payload)
        .await
        .map_err(AppError::from)?;
    tracing::info!(worker_id = worker.id, name = %worker.name, "Worker created");
    Ok(Json(worker.into()))
}

/// PUT /worker/{id}
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<WorkerUpdate>,
) -> AppResult<Json<WorkerResponse>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.password, "password", MAX_PASSWORD_LEN)?;
    if let Some(p) = &payload.password {
        validate_required_text(p, "password", MAX_PASSWORD_LEN)?;
    }

    let worker = repository::worker::update(&state.pool, id, payload)
        .await
        .map_err(AppError::from)?;
    Ok(Json(worker.into()))
}

/// DELETE /worker/{id}
///
/// Hard delete. Tokens already issued to the worker stay valid until
/// they expire on their own (stateless verification).
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = repository::worker::delete(&state.pool, id)
        .await
        .map_err(AppError::from)?;
    if !deleted {
        return Err(AppError::not_found(format!("Worker {id} not found")));
    }
    tracing::info!(worker_id = id, "Worker deleted");
    Ok(Json(true))
}
