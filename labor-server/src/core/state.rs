//! Server state
//!
//! Shared application state cloned into every handler.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::{repository, DbService};
use shared::models::WorkerCreate;
use shared::AppError;

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// Initialize state: open the database, build the JWT service and
    /// seed the bootstrap admin if needed
    pub async fn initialize(config: Config) -> Result<Self, AppError> {
        let db = DbService::new(&config.database_path).await?;

        let jwt_service = JwtService::with_config(config.jwt.clone());

        let state = Self {
            config: Arc::new(config),
            pool: db.pool,
            jwt_service: Arc::new(jwt_service),
        };

        state.seed_admin().await?;

        Ok(state)
    }

    /// Seed the `Admin` worker when no admin exists yet
    ///
    /// Idempotent: a restart against an existing database does nothing,
    /// and changing `ADMIN_PASSWORD` later never rewrites credentials.
    async fn seed_admin(&self) -> Result<(), AppError> {
        if repository::worker::any_admin_exists(&self.pool).await? {
            return Ok(());
        }

        let Some(password) = self.config.admin_password.clone() else {
            tracing::warn!("No admin worker exists and ADMIN_PASSWORD is unset; admin routes are unreachable");
            return Ok(());
        };

        repository::worker::create(
            &self.pool,
            WorkerCreate {
                soft_one_id: String::new(),
                name: "Admin".into(),
                password,
                admin: true,
            },
        )
        .await?;
        tracing::info!("Seeded bootstrap admin worker");
        Ok(())
    }

    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
