//! Secret Hashing and Verification
//!
//! One-way salted hashing for anything that must be checked but never
//! recovered: account passwords and derived one-time codes.
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Fresh random salt per call, so equal inputs never share a hash
//! - Zeroization of clear-text input
//! - Constant-time comparison inside the Argon2 verifier
//!
//! Content policy (length, character set) is not enforced here; callers
//! validate before hashing.

use std::fmt;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum SecretHashError {
    /// Hashing operation failed
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),
}

// ============================================================================
// Clear Text Secret (Zeroized on drop)
// ============================================================================

/// Clear text secret with automatic memory zeroization
///
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
///
/// ```rust
/// use platform::password::ClearTextSecret;
///
/// let secret = ClearTextSecret::new("correct-horse");
/// let hashed = secret.hash(None).unwrap();
/// assert!(hashed.verify(&secret, None));
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextSecret(String);

impl ClearTextSecret {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Secret bytes with the optional pepper appended
    fn peppered(&self, pepper: Option<&[u8]>) -> Vec<u8> {
        let mut bytes = self.0.as_bytes().to_vec();
        if let Some(p) = pepper {
            bytes.extend_from_slice(p);
        }
        bytes
    }

    /// Hash the secret using Argon2id with a fresh 128-bit salt
    ///
    /// ## Arguments
    /// * `pepper` - Optional application-wide secret appended before hashing
    pub fn hash(&self, pepper: Option<&[u8]>) -> Result<HashedSecret, SecretHashError> {
        let mut input = self.peppered(pepper);
        let salt = SaltString::generate(&mut OsRng);

        // OWASP defaults: m=19456 (19 MiB), t=2, p=1
        let result = Argon2::default()
            .hash_password(&input, &salt)
            .map(|hash| HashedSecret {
                hash: hash.to_string(),
            })
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()));

        input.zeroize();
        result
    }
}

impl fmt::Debug for ClearTextSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextSecret")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Secret (Safe to store)
// ============================================================================

/// Hashed secret in PHC string format
///
/// The PHC string carries algorithm, version, parameters, salt and hash,
/// so verification needs nothing but the string itself.
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret {
    hash: String,
}

impl HashedSecret {
    /// Wrap a stored value as-is
    ///
    /// A malformed value simply never verifies.
    pub fn from_stored(s: impl Into<String>) -> Self {
        Self { hash: s.into() }
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a secret against this hash
    ///
    /// Returns `false` for a wrong secret and for a malformed hash alike.
    pub fn verify(&self, secret: &ClearTextSecret, pepper: Option<&[u8]>) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        let mut input = secret.peppered(pepper);
        let matched = Argon2::default()
            .verify_password(&input, &parsed_hash)
            .is_ok();
        input.zeroize();
        matched
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedSecret")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
