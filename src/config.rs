//! Service Configuration
//!
//! All configuration values are loaded from environment variables once at
//! startup and are immutable afterwards.

use crate::error::ApiError;
use std::env;

/// Service configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Postgres connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// JWT secret key for signing tokens (from JWT_SECRET env var)
    pub jwt_secret: String,

    /// JWT token lifetime in seconds (from JWT_EXPIRATION_SECS env var)
    pub jwt_expiration_secs: i64,

    /// bcrypt work factor (from BCRYPT_COST env var)
    pub bcrypt_cost: u32,

    /// Socket address to listen on (from BIND_ADDR env var)
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Panics
    /// Panics if JWT_SECRET environment variable is not set
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/campus_auth".to_string()),

            jwt_secret: env::var("JWT_SECRET")
                .expect("JWT_SECRET environment variable must be set"),

            jwt_expiration_secs: env::var("JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(86400), // 24 hours default

            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(bcrypt::DEFAULT_COST),

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.jwt_secret.len() < 32 {
            return Err(ApiError::Validation(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        if self.jwt_expiration_secs <= 0 {
            return Err(ApiError::Validation(
                "JWT_EXPIRATION_SECS must be positive".to_string(),
            ));
        }

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ApiError::Validation(
                "BCRYPT_COST must be between 4 and 31".to_string(),
            ));
        }

        Ok(())
    }
}
