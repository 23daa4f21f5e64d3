//! Authentication Service
//!
//! Orchestrates the credential lifecycle: registration hashes and persists,
//! login verifies and issues a token, QR generation renders and attaches
//! the identity badge. Each call is an independent unit of work; the only
//! shared state is the immutable config and the store handle.

use chrono::Duration;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::{LoginRequest, NewUser, QrCodeResponse, RegisterRequest, TokenResponse, User};
use crate::password;
use crate::qr;
use crate::store::UserStore;
use crate::token::TokenService;

/// Authentication service
pub struct AuthService {
    store: UserStore,
    tokens: TokenService,
    config: AppConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(store: UserStore, config: AppConfig) -> Self {
        let tokens = TokenService::new(
            &config.jwt_secret,
            Duration::seconds(config.jwt_expiration_secs),
        );

        Self {
            store,
            tokens,
            config,
        }
    }

    /// Get reference to the user store
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// Get reference to the token service
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Register a new user
    ///
    /// The friendly duplicate check races with concurrent registrations;
    /// the store's unique constraints settle the race, so `create` can
    /// still return `DuplicateAccount`.
    pub async fn register(&self, req: RegisterRequest) -> Result<User, ApiError> {
        if self.store.find_by_email(&req.email).await?.is_some() {
            return Err(ApiError::DuplicateAccount);
        }

        let password_hash = password::hash_password(&req.password, self.config.bcrypt_cost)?;

        let user = self
            .store
            .create(NewUser {
                username: req.username,
                email: req.email,
                full_name: req.full_name,
                password_hash,
                role: req.role,
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Authenticate by email and password, issuing a bearer token
    ///
    /// Unknown email and wrong password collapse into the same rejection so
    /// responses cannot be used to enumerate accounts.
    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse, ApiError> {
        let user = self
            .store
            .find_by_email(&req.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !password::verify_password(&req.password, &user.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(user.id, user.role)?;

        tracing::info!(user_id = %user.id, "user logged in");
        Ok(TokenResponse::bearer(access_token))
    }

    /// Render the identity QR for a user and persist it on the row
    pub async fn generate_qr(&self, user: &User) -> Result<QrCodeResponse, ApiError> {
        let data = qr::qr_payload(user);
        let qr_code_base64 = qr::render_png_base64(&data)?;

        self.store.attach_qr(user.id, &qr_code_base64).await?;

        tracing::info!(user_id = %user.id, "QR code generated");
        Ok(QrCodeResponse {
            user_id: user.id,
            qr_code_base64,
            data,
        })
    }

    /// Fetch a user's previously generated QR, if any
    pub fn stored_qr(&self, user: &User) -> Result<QrCodeResponse, ApiError> {
        let qr_code_base64 = user.qr_code.clone().ok_or(ApiError::NotFound)?;
        Ok(QrCodeResponse {
            user_id: user.id,
            qr_code_base64,
            data: qr::qr_payload(user),
        })
    }
}
