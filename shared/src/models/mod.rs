//! Data models
//!
//! Shared between the server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), all timestamps Unix millis.

pub mod data_report;
pub mod picking;
pub mod worker;

// Re-exports
pub use data_report::*;
pub use picking::*;
pub use worker::*;
