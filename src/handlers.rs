//! HTTP Handlers
//!
//! REST API endpoints and the route table.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::extractors::CurrentUser;
use crate::middleware;
use crate::models::*;
use crate::service::AuthService;

/// Shared service state
pub type AppState = Arc<AuthService>;

// ============================================
// Route Builder
// ============================================

/// Create the service router
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health/db", get(health_db))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected = Router::new()
        .route("/users/me", get(get_current_user))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/qr/generate", post(generate_qr))
        .route("/qr/:user_id", get(get_qr))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    let admin = Router::new()
        .route("/users", get(list_users))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(admin)
        .with_state(state)
}

// users can only touch their own records unless they're admin
fn ensure_self_or_admin(current: &User, target: Uuid) -> Result<(), ApiError> {
    if current.id == target || current.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

// ============================================
// Service Info / Health
// ============================================

/// GET /
async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "User/Auth/QR Microservice API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /health/db
///
/// Check database connectivity
async fn health_db(State(state): State<AppState>) -> impl IntoResponse {
    match state.store().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "healthy",
                "database": "connected",
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string(),
            })),
        ),
    }
}

// ============================================
// Authentication
// ============================================

/// POST /auth/register
///
/// Register a new user account
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let user = state.register(req).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login
///
/// Authenticate and return a bearer token
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let response = state.login(req).await?;

    Ok(Json(response))
}

// ============================================
// User Management
// ============================================

/// GET /users/me
///
/// Get current authenticated user
async fn get_current_user(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(UserResponse::from(user))
}

/// GET /users
///
/// List all users (admin only, gated by middleware)
async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.store().list_all().await?;
    let users: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(Json(users))
}

/// GET /users/:id
///
/// Get user by ID (self or admin)
async fn get_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.store().find_by_id(id).await?.ok_or(ApiError::NotFound)?;

    ensure_self_or_admin(&current, user.id)?;

    Ok(Json(UserResponse::from(user)))
}

/// DELETE /users/:id
///
/// Delete a user (self or admin)
async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    ensure_self_or_admin(&current, id)?;

    if !state.store().delete(id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!(user_id = %id, deleted_by = %current.id, "user deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

// ============================================
// QR Codes
// ============================================

/// POST /qr/generate
///
/// Generate and persist the QR identity badge for the current user
async fn generate_qr(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<impl IntoResponse, ApiError> {
    let response = state.generate_qr(&user).await?;
    Ok(Json(response))
}

/// GET /qr/:user_id
///
/// Get the stored QR badge for a user (self or admin)
async fn get_qr(
    State(state): State<AppState>,
    CurrentUser(current): CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store()
        .find_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    ensure_self_or_admin(&current, user.id)?;

    let response = state.stored_qr(&user)?;
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            username: "bob".to_string(),
            email: "bob@x.com".to_string(),
            full_name: None,
            password_hash: String::new(),
            role,
            created_at: Utc::now(),
            qr_code: None,
        }
    }

    #[test]
    fn self_or_admin_gate() {
        let student = user(UserRole::Student);
        let admin = user(UserRole::Admin);
        let other = Uuid::new_v4();

        assert!(ensure_self_or_admin(&student, student.id).is_ok());
        assert!(ensure_self_or_admin(&admin, other).is_ok());
        assert!(matches!(
            ensure_self_or_admin(&student, other),
            Err(ApiError::Forbidden)
        ));
    }
}
