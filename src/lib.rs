//! Campus Auth
//!
//! User management, authentication, and QR identity badge microservice:
//! - User registration with bcrypt password hashing
//! - Login issuing stateless HS256 bearer tokens
//! - Role-based access control (student / teacher / admin)
//! - QR-code identity badges rendered on demand
//!
//! # Configuration
//!
//! All configuration is loaded from environment variables:
//! - `JWT_SECRET` - Secret key for signing tokens (required, min 32 chars)
//! - `JWT_EXPIRATION_SECS` - Token lifetime in seconds (default: 86400)
//! - `DATABASE_URL` - Postgres connection string
//! - `BCRYPT_COST` - bcrypt work factor (default: 12)
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0:8000)

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod qr;
pub mod service;
pub mod store;
pub mod token;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::ApiError;
pub use extractors::CurrentUser;
pub use handlers::AppState;
pub use models::*;
pub use service::AuthService;
pub use store::UserStore;
pub use token::{TokenError, TokenService};
