//! Application Configuration
//!
//! Configuration for the Identity application layer.

/// Role every registered account receives
pub const STANDARD_ROLE: &str = "Standard";

/// Identity application configuration
#[derive(Clone)]
pub struct IdentityConfig {
    /// Role granted at registration
    pub default_role: String,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Let accounts registered without a password sign in with an empty one
    pub allow_passwordless_sign_in: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            default_role: STANDARD_ROLE.to_string(),
            password_pepper: None,
            allow_passwordless_sign_in: false,
        }
    }
}

impl IdentityConfig {
    /// Create config for development (fixed, well-known pepper)
    pub fn development() -> Self {
        Self {
            password_pepper: Some(b"development-pepper".to_vec()),
            ..Default::default()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("default_role", &self.default_role)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("allow_passwordless_sign_in", &self.allow_passwordless_sign_in)
            .finish()
    }
}
