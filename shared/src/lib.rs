//! Shared types for the labor-tracking backend
//!
//! Common types used by the server and API clients: data models,
//! the unified error system and small utility helpers.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
