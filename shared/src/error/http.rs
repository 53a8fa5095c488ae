//! HTTP status code mapping and axum response conversion

use super::codes::ErrorCode;
use super::types::{ApiResponse, AppError};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound | Self::PickingNotFound | Self::WorkerNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists | Self::WorkerNameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::AdminRequired => StatusCode::FORBIDDEN,

            // 500 Internal Server Error
            Self::InternalError | Self::DatabaseError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.http_status();

        // Internal errors: log the raw message, return a generic one
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(code = self.code.as_u16(), error = %self.message, "Request failed");
            let sanitized = AppError::new(self.code);
            return (status, Json(ApiResponse::<()>::error(&sanitized))).into_response();
        }

        (status, Json(ApiResponse::<()>::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::NotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::WorkerNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::PickingNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenInvalid.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        // Admin rejection is distinct from invalid-token
        assert_eq!(
            ErrorCode::AdminRequired.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_validation_defaults_to_bad_request() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::RequiredField.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::PickingAlreadyClosed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_system_errors_are_500() {
        assert_eq!(
            ErrorCode::DatabaseError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
