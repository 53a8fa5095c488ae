//! Unified error codes for the labor-tracking backend
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Picking errors
//! - 8xxx: Worker errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (name/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin claim required
    AdminRequired = 2003,

    // ==================== 4xxx: Picking ====================
    /// Picking record not found
    PickingNotFound = 4001,
    /// Picking record has already been closed
    PickingAlreadyClosed = 4002,
    /// Unknown work type
    WorkTypeInvalid = 4003,

    // ==================== 8xxx: Worker ====================
    /// Worker not found
    WorkerNotFound = 8001,
    /// Worker name already taken
    WorkerNameExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
}

impl ErrorCode {
    /// Get the default human-readable message for this error code
    pub fn message(&self) -> &'static str {
        match self {
            Self::Success => "OK",
            Self::Unknown => "Unknown error",
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",
            Self::AlreadyExists => "Resource already exists",
            Self::InvalidRequest => "Invalid request",
            Self::RequiredField => "Required field missing",

            Self::NotAuthenticated => "Authentication required",
            Self::InvalidCredentials => "Invalid name or password",
            Self::TokenExpired => "Token expired",
            Self::TokenInvalid => "Invalid token",

            Self::PermissionDenied => "Permission denied",
            Self::AdminRequired => "Admin access required",

            Self::PickingNotFound => "Picking record not found",
            Self::PickingAlreadyClosed => "Picking record already closed",
            Self::WorkTypeInvalid => "Unknown work type",

            Self::WorkerNotFound => "Worker not found",
            Self::WorkerNameExists => "Worker name already taken",

            Self::InternalError => "Internal server error",
            Self::DatabaseError => "Database error",
            Self::ConfigError => "Configuration error",
        }
    }

    /// Numeric value of the code
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.as_u16())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

/// Error returned when converting an unknown u16 into an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            7 => Self::RequiredField,

            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,

            2001 => Self::PermissionDenied,
            2003 => Self::AdminRequired,

            4001 => Self::PickingNotFound,
            4002 => Self::PickingAlreadyClosed,
            4003 => Self::WorkTypeInvalid,

            8001 => Self::WorkerNotFound,
            8002 => Self::WorkerNameExists,

            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,

            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}
