/// One-time tokens for email verification and password reset
///
/// Tokens are random base62 strings handed to the user exactly once; only
/// the SHA-256 digest is stored, so a database leak exposes nothing usable.
/// Delivery (email) is outside this service.
///
/// # Example
///
/// ```
/// use taskboard_shared::auth::token::{generate_token, hash_token};
///
/// let (token, hash) = generate_token();
/// assert_eq!(token.len(), 32);
/// assert_eq!(hash, hash_token(&token));
/// ```
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a one-time token (characters)
const TOKEN_LENGTH: usize = 32;

/// How long an email-verification token stays valid
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

/// How long a password-reset token stays valid
pub const RESET_TOKEN_TTL_MINUTES: i64 = 20;

/// Generates a new one-time token.
///
/// # Returns
///
/// Tuple of (plaintext_token, sha256_hex_digest). Store only the digest.
pub fn generate_token() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let token: String = (0..TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    let hash = hash_token(&token);
    (token, hash)
}

/// Hashes a token with SHA-256, hex-encoded (64 characters).
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Expiry instant for a verification token issued now.
pub fn verification_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS)
}

/// Expiry instant for a reset token issued now.
pub fn reset_expiry() -> DateTime<Utc> {
    Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_format() {
        let (token, hash) = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_hash_is_deterministic() {
        let (token, hash) = generate_token();
        assert_eq!(hash_token(&token), hash);
        assert_eq!(hash_token(&token), hash_token(&token));
    }

    #[test]
    fn test_tokens_are_unique() {
        let (a, _) = generate_token();
        let (b, _) = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expiry_windows() {
        assert!(verification_expiry() > Utc::now());
        assert!(reset_expiry() > Utc::now());
        assert!(verification_expiry() > reset_expiry());
    }
}
