//! Labor Server - warehouse labor-tracking backend
//!
//! # Architecture
//!
//! - **Auth** (`auth`): JWT + Argon2 authentication, admin gating
//! - **Database** (`db`): SQLite connection pool + sqlx repositories
//! - **HTTP API** (`api`): route handlers under `/worker` and `/picking`
//! - **Reporting** (`reporting`): in-memory aggregation folds and CSV export
//!
//! # Module structure
//!
//! ```text
//! labor-server/src/
//! ├── core/          # config, state, server loop
//! ├── auth/          # JWT service, middleware, extractor
//! ├── db/            # pool setup, repositories
//! ├── api/           # HTTP routes and handlers
//! ├── reporting/     # aggregation folds, availability, CSV
//! └── utils/         # logger, validation, time helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod reporting;
pub mod utils;

// Re-export public types
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use shared::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
