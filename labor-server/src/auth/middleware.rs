//! Authentication middleware
//!
//! Axum middleware for JWT authentication and admin gating.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use shared::AppError;

/// Authentication middleware — requires a valid bearer token
///
/// Extracts and validates the JWT from `Authorization: Bearer <token>`.
/// On success injects [`CurrentUser`] into request extensions.
///
/// # Public paths (skipped)
///
/// - `POST /worker/login`
/// - `GET /worker/token_validation`
/// - `/health`
///
/// # Rejections
///
/// | Condition | Status |
/// |-----------|--------|
/// | No Authorization header | 401 NotAuthenticated |
/// | Expired token | 401 TokenExpired |
/// | Malformed/bad-signature token | 401 TokenInvalid |
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // CORS preflight passes through
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let is_public_route =
        path == "/worker/login" || path == "/worker/token_validation" || path == "/health";
    if is_public_route {
        return Ok(next.run(req).await);
    }

    let jwt_service = state.get_jwt_service();
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(target: "security", uri = %req.uri(), "Missing bearer token");
            return Err(AppError::unauthorized());
        }
    };

    match jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(target: "security", error = %e, uri = %req.uri(), "Token rejected");
            match e {
                crate::auth::JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Admin middleware — requires the admin claim
///
/// Checks `CurrentUser.admin`; the rejection is access-denied (403),
/// distinct from the invalid-token rejections above.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;

    if !user.is_admin() {
        tracing::warn!(
            target: "security",
            user_id = user.id,
            name = %user.name,
            "Admin route rejected"
        );
        return Err(AppError::new(shared::ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
