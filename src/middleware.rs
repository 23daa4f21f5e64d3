//! Authorization Gate
//!
//! Middleware that authenticates bearer tokens and enforces role-based
//! access. Authentication verifies the token, then resolves the account by
//! subject id; a token referencing a deleted account is treated the same
//! as a missing or invalid one. All checks are pure reads.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::models::{User, UserRole};

/// Resolve the acting user from the Authorization header
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthenticated)?;

    let claims = state.tokens().verify(token)?;

    state
        .store()
        .find_by_id(claims.sub)
        .await?
        .ok_or(ApiError::Unauthenticated)
}

/// Check a resolved account against a flat role allow-list
pub fn authorize(user: &User, allowed: &[UserRole]) -> Result<(), ApiError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Require an authenticated user
///
/// Stores the resolved `User` in request extensions for extractors.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require an authenticated user with the admin role
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers()).await?;
    authorize(&user, &[UserRole::Admin])?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn user_with_role(role: UserRole) -> User {
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
    fn admin_allow_list_accepts_only_admin() {
        let allowed = [UserRole::Admin];
        assert!(authorize(&user_with_role(UserRole::Admin), &allowed).is_ok());
        assert!(matches!(
            authorize(&user_with_role(UserRole::Student), &allowed),
            Err(ApiError::Forbidden)
        ));
        assert!(matches!(
            authorize(&user_with_role(UserRole::Teacher), &allowed),
            Err(ApiError::Forbidden)
        ));
    }

    #[test]
    fn allow_list_is_exact_membership() {
        let allowed = [UserRole::Teacher, UserRole::Admin];
        assert!(authorize(&user_with_role(UserRole::Teacher), &allowed).is_ok());
        assert!(authorize(&user_with_role(UserRole::Student), &allowed).is_err());
    }
}
