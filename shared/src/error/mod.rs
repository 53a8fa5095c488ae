//! Unified error system
//!
//! - [`ErrorCode`]: standardized numeric codes for all error types
//! - [`AppError`]: rich error type with codes, messages, and details
//! - [`ApiResponse`]: unified API response format
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Picking errors
//! - 8xxx: Worker errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, ApiResponse};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::NotFound);
//!
//! // Create an error with custom message
//! let err = AppError::with_message(ErrorCode::ValidationFailed, "Invalid date format");
//!
//! // Convert to API response
//! let response = ApiResponse::<()>::error(&err);
//! ```

mod codes;
mod http;
mod types;

pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{ApiResponse, AppError, AppResult};
