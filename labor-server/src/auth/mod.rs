//! Authentication module
//!
//! - [`JwtService`] - token issuance and validation
//! - [`require_auth`] / [`require_admin`] - axum middleware
//! - [`CurrentUser`] - decoded claims, injected into handlers

mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use password::{hash_password, verify_password};
