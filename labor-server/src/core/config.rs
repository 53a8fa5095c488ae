use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Notes |
/// |----------|---------|-------|
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | DATABASE_PATH | labor.db | SQLite database file |
/// | JWT_SECRET | (none) | mandatory, at least 32 chars — startup fails without it |
/// | JWT_EXPIRATION_MINUTES | 1440 | token lifetime (24h) |
/// | ADMIN_PASSWORD | (none) | seeds the bootstrap admin when no admin exists |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | LOG_DIR | (none) | daily-rotated log files when set |
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API listen port
    pub http_port: u16,
    /// SQLite database path (`:memory:` supported for tests)
    pub database_path: String,
    /// JWT authentication configuration
    pub jwt: JwtConfig,
    /// Password for the seeded `Admin` worker, applied only when the
    /// workers table has no admin yet
    pub admin_password: Option<String>,
    /// Runtime environment: development | staging | production
    pub environment: String,
    /// Optional log directory (daily file rotation)
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Fails when `JWT_SECRET` is missing or too short: an unsigned-token
    /// fallback is not acceptable even in development.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "labor.db".into()),
            jwt: JwtConfig::from_env()?,
            admin_password: std::env::var("ADMIN_PASSWORD").ok(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_dir: std::env::var("LOG_DIR").ok(),
        })
    }

    /// Whether this is a production deployment
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}
