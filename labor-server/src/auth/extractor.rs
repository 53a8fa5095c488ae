//! JWT extractor
//!
//! Lets protected handlers take [`CurrentUser`] as an argument.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::auth::{CurrentUser, JwtService};
use crate::core::ServerState;
use shared::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Already extracted by the middleware
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
            None => return Err(AppError::unauthorized()),
        };

        let jwt_service = state.get_jwt_service();
        match jwt_service.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims)
                    .map_err(|e| AppError::invalid_token(format!("Malformed JWT claims: {}", e)))?;

                // Store for potential reuse
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(crate::auth::JwtError::ExpiredToken) => Err(AppError::token_expired()),
            Err(_) => Err(AppError::invalid_token("Invalid token")),
        }
    }
}
