//! Credential primitives: password digests and opaque remember tokens.
//!
//! Digests are bcrypt with a per-call random salt, so hashing the same
//! input twice yields different digests and verification accepts both.
//! The clear remember token is handed to the caller for cookie
//! transport; only its digest is ever persisted.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use bcrypt::{DEFAULT_COST, hash, verify};
use rand::RngCore;

use crate::error::Result;

/// Number of random bytes behind a remember token.
const TOKEN_BYTES: usize = 16;

/// The kinds of opaque tokens an account can be authenticated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Remember,
}

/// One-way, salted, computationally expensive digest of a password.
pub fn hash_password(password: &str) -> Result<String> {
    Ok(hash(password, DEFAULT_COST)?)
}

/// Checks a clear password against a stored digest. A malformed or
/// empty digest is a failed verification, never an error.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}

/// A freshly issued remember token: the clear form for transport and
/// the digest for persistence.
#[derive(Debug, Clone)]
pub struct RememberToken {
    pub clear: String,
    pub digest: String,
}

impl RememberToken {
    /// Generates a cryptographically random token and its digest.
    pub fn generate() -> Result<RememberToken> {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let clear = URL_SAFE_NO_PAD.encode(bytes);
        let digest = hash(&clear, DEFAULT_COST)?;
        Ok(RememberToken { clear, digest })
    }
}

/// Verifies a presented token against the stored digest for the given
/// token kind. An absent digest always fails authentication.
pub fn authenticated(kind: TokenKind, presented: &str, stored_digest: Option<&str>) -> bool {
    let Some(digest) = stored_digest else {
        return false;
    };
    match kind {
        TokenKind::Remember => verify_password(presented, digest),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let digest = hash_password("foobar").unwrap();
        assert!(verify_password("foobar", &digest));
        assert!(!verify_password("foobaz", &digest));
    }

    #[test]
    fn test_salt_is_randomized_per_call() {
        let first = hash_password("foobar").unwrap();
        let second = hash_password("foobar").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("foobar", &first));
        assert!(verify_password("foobar", &second));
    }

    #[test]
    fn test_verify_malformed_digest_is_false() {
        assert!(!verify_password("foobar", ""));
        assert!(!verify_password("foobar", "not-a-bcrypt-digest"));
    }

    #[test]
    fn test_remember_token_roundtrip() {
        let token = RememberToken::generate().unwrap();
        assert!(!token.clear.is_empty());
        assert!(authenticated(
            TokenKind::Remember,
            &token.clear,
            Some(&token.digest)
        ));
        assert!(!authenticated(
            TokenKind::Remember,
            "wrong-token",
            Some(&token.digest)
        ));
    }

    #[test]
    fn test_remember_tokens_are_unique() {
        let first = RememberToken::generate().unwrap();
        let second = RememberToken::generate().unwrap();
        assert_ne!(first.clear, second.clear);
    }

    #[test]
    fn test_authenticated_with_absent_digest_is_false() {
        // Required contract: no digest stored means false, never a panic.
        assert!(!authenticated(TokenKind::Remember, "", None));
        assert!(!authenticated(TokenKind::Remember, "anything", None));
    }
}
