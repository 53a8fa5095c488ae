//! Worker Model

use serde::{Deserialize, Serialize};

/// Worker row as stored in the `workers` table
///
/// Carries the password hash; never serialized into API responses
/// (`skip_serializing` as a second line of defense — handlers return
/// [`WorkerResponse`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Worker {
    pub id: i64,
    /// External inventory-system identifier
    pub soft_one_id: String,
    pub name: String,
    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password: String,
    pub admin: bool,
    /// Creation time (Unix millis)
    pub created_at: i64,
}

/// Worker as returned by the API (password hash stripped)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerResponse {
    pub id: i64,
    pub soft_one_id: String,
    pub name: String,
    pub admin: bool,
    pub created_at: i64,
}

impl From<Worker> for WorkerResponse {
    fn from(w: Worker) -> Self {
        Self {
            id: w.id,
            soft_one_id: w.soft_one_id,
            name: w.name,
            admin: w.admin,
            created_at: w.created_at,
        }
    }
}

/// Create worker payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerCreate {
    pub soft_one_id: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub admin: bool,
}

/// Update worker payload
///
/// Name is always written; password is re-hashed only when supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerUpdate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Login response: token plus the authenticated worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: WorkerResponse,
}

/// Token validation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenValidation {
    pub is_valid: bool,
}
