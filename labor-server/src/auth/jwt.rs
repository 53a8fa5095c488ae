//! JWT token service
//!
//! Issues and validates the compact session tokens carrying
//! `{id, admin, expiry}` claims.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted secret length (bytes)
const MIN_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC signing secret (at least 32 bytes)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl JwtConfig {
    /// Load from environment
    ///
    /// `JWT_SECRET` is mandatory: there is no generated or hardcoded
    /// fallback, in any environment.
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| JwtError::Config("JWT_SECRET environment variable must be set".into()))?;
        Self::with_secret(secret)
    }

    /// Build a config around an explicit secret (tests, embedding)
    pub fn with_secret(secret: impl Into<String>) -> Result<Self, JwtError> {
        let secret = secret.into();
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtError::Config(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
            )));
        }
        Ok(Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 24 hours
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "labor-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "labor-clients".to_string()),
        })
    }
}

/// JWT claims stored in the token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Worker ID (subject)
    pub sub: String,
    /// Worker name
    pub name: String,
    /// Admin claim — grants access to management/reporting endpoints
    pub admin: bool,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// JWT token service
#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// Create a new JWT service from a config
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Generate a new token for a worker
    pub fn generate_token(
        &self,
        worker_id: i64,
        name: &str,
        admin: bool,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: worker_id.to_string(),
            name: name.to_string(),
            admin,
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Extract the token from an Authorization header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Current user context (parsed from JWT claims)
///
/// Created by the auth middleware and injected into request extensions;
/// also available as a handler extractor.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Worker ID
    pub id: i64,
    /// Worker name
    pub name: String,
    /// Admin claim
    pub admin: bool,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse()
            .map_err(|_| JwtError::InvalidToken(format!("Non-numeric subject: {}", claims.sub)))?;
        Ok(Self {
            id,
            name: claims.name,
            admin: claims.admin,
        })
    }
}

impl CurrentUser {
    /// Whether this user carries the admin claim
    pub fn is_admin(&self) -> bool {
        self.admin
    }
}
