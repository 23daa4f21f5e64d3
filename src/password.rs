//! Credential Hashing
//!
//! bcrypt password hashing with explicit input-length handling. bcrypt only
//! consumes the first 72 bytes of its input, so passwords are truncated to
//! that prefix *before* hashing. Truncation is applied identically on the
//! hash and verify paths, which keeps oversized passwords well-defined
//! instead of failing registration. The cutoff counts bytes, not
//! characters; multi-byte characters can hit the limit well under 72
//! characters. This deliberately trades entropy for compatibility on
//! passwords longer than the limit.

use bcrypt::BcryptError;

/// bcrypt's hard input ceiling, in bytes
pub const MAX_PASSWORD_BYTES: usize = 72;

fn truncate(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(MAX_PASSWORD_BYTES)]
}

/// Hash a password with a randomized salt
///
/// Repeated calls on the same password yield different hashes; the output
/// is self-describing (`$2b$...`) and embeds algorithm, cost, and salt.
pub fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    bcrypt::hash(truncate(password), cost)
}

/// Verify a password against a stored hash
///
/// Returns `false` for malformed hash strings rather than erroring, so a
/// corrupt row can never take down a login request.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(truncate(password), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    // bcrypt's minimum cost keeps the work factor out of the test runtime
    // (bcrypt::MIN_COST is private)
    const COST: u32 = 4;

    #[test]
    fn round_trip() {
        let hash = hash_password("secret123", COST).unwrap();
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("secret124", &hash));
    }

    #[test]
    fn salts_are_randomized() {
        let a = hash_password("secret123", COST).unwrap();
        let b = hash_password("secret123", COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("secret123", &a));
        assert!(verify_password("secret123", &b));
    }

    #[test]
    fn passwords_sharing_a_72_byte_prefix_verify() {
        let prefix = "a".repeat(MAX_PASSWORD_BYTES);
        let p1 = format!("{prefix}-first-tail");
        let p2 = format!("{prefix}-second-tail");

        let hash = hash_password(&p1, COST).unwrap();
        assert!(verify_password(&p2, &hash));
    }

    #[test]
    fn oversized_password_does_not_error() {
        let long = "x".repeat(10_000);
        let hash = hash_password(&long, COST).unwrap();
        assert!(verify_password(&long, &hash));
    }

    #[test]
    fn multibyte_password_counts_bytes_not_chars() {
        // 71 ascii bytes followed by a 2-byte char: the cutoff lands in the
        // middle of the codepoint. The slice feeds bcrypt raw bytes, never a
        // &str, so this must not panic.
        let p1 = format!("{}\u{00e9}", "a".repeat(71));
        let p2 = format!("{}\u{00e8}", "a".repeat(71)); // same first byte of the pair

        let hash = hash_password(&p1, COST).unwrap();
        assert!(verify_password(&p1, &hash));
        // é (0xC3 0xA9) and è (0xC3 0xA8) share the truncated 72nd byte
        assert!(verify_password(&p2, &hash));
    }

    #[test]
    fn malformed_hash_returns_false() {
        assert!(!verify_password("secret123", "not-a-bcrypt-hash"));
        assert!(!verify_password("secret123", ""));
    }
}
