//! Token Issuance and Verification
//!
//! Stateless HS256 bearer tokens. A token is valid purely by signature and
//! expiry; there is no revocation list and no refresh flow. Verification is
//! a pure function of (token, instant, secret), so expiry is checked against
//! a caller-supplied instant rather than inside the JWT library — the
//! `*_at` variants make boundary behavior deterministic in tests while the
//! plain wrappers use the system clock.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::models::{Claims, UserRole};

/// Token verification failures
///
/// Expired and tampered/malformed tokens are distinguishable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("invalid token")]
    Invalid,
}

/// Issues and verifies signed bearer tokens
///
/// Keys are derived once from the process-wide secret at construction; the
/// secret is never rotated at runtime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for a subject, expiring `ttl` after the system clock
    pub fn issue(&self, sub: Uuid, role: UserRole) -> Result<String, TokenError> {
        self.issue_at(sub, role, Utc::now())
    }

    /// Issue a token expiring `ttl` after the given instant
    pub fn issue_at(
        &self,
        sub: Uuid,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub,
            role,
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Token encoding failed: {:?}", e);
            TokenError::Invalid
        })
    }

    /// Verify a token against the system clock
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify signature and payload shape, then expiry against `now`
    ///
    /// A token is rejected when the signature does not match, the payload is
    /// malformed, or `now` has reached the expiration instant.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // expiry is checked below against the caller's instant
        validation.validate_exp = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!("Token rejected: {:?}", e);
            TokenError::Invalid
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-test-secret-test-secret!";

    fn service() -> TokenService {
        TokenService::new(SECRET, Duration::minutes(30))
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn round_trip_preserves_subject_and_role() {
        let svc = service();
        let sub = Uuid::new_v4();
        let now = epoch();

        let token = svc.issue_at(sub, UserRole::Student, now).unwrap();
        let claims = svc.verify_at(&token, now + Duration::minutes(29)).unwrap();

        assert_eq!(claims.sub, sub);
        assert_eq!(claims.role, UserRole::Student);
    }

    #[test]
    fn expired_token_is_rejected() {
        let svc = service();
        let now = epoch();
        let token = svc.issue_at(Uuid::new_v4(), UserRole::Admin, now).unwrap();

        // exactly at expiry counts as expired
        assert_eq!(
            svc.verify_at(&token, now + Duration::minutes(30)),
            Err(TokenError::Expired)
        );
        assert_eq!(
            svc.verify_at(&token, now + Duration::minutes(31)),
            Err(TokenError::Expired)
        );
        // one second before expiry is still valid
        assert!(svc
            .verify_at(&token, now + Duration::minutes(30) - Duration::seconds(1))
            .is_ok());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service();
        let now = epoch();
        let token = svc.issue_at(Uuid::new_v4(), UserRole::Student, now).unwrap();

        // flip one character in the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let payload = &mut parts[1];
        let flipped = if payload.ends_with('A') { "B" } else { "A" };
        payload.replace_range(payload.len() - 1.., flipped);
        let tampered = parts.join(".");

        assert_eq!(
            svc.verify_at(&tampered, now),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let svc = service();
        let other = TokenService::new("another-secret-another-secret-12", Duration::minutes(30));
        let now = epoch();

        let token = svc.issue_at(Uuid::new_v4(), UserRole::Student, now).unwrap();
        assert_eq!(other.verify_at(&token, now), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_token_is_rejected() {
        let svc = service();
        assert_eq!(
            svc.verify_at("not.a.token", epoch()),
            Err(TokenError::Invalid)
        );
        assert_eq!(svc.verify_at("", epoch()), Err(TokenError::Invalid));
    }
}
