//! Email Value Object
//!
//! Represents a single, syntactically well-formed `local@domain` address.
//! Ownership of the address is proven separately (verified flag).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::validation::ValidationError;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

const LOCAL_PART_MAX_LENGTH: usize = 64;

/// `atext` punctuation of RFC 5322 allowed in a local part
const LOCAL_PART_SPECIAL_CHARS: &[char] = &[
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '/', '=', '?', '^', '_', '`', '{', '|', '}', '~',
];

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse a single address, normalized to lowercase
    pub fn parse(email: &str) -> Result<Self, ValidationError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(ValidationError::UnparseableEmail);
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        Self::is_valid_local_part(local) && Self::is_valid_domain(domain)
    }

    /// Dot-atom: atext runs separated by single dots
    fn is_valid_local_part(local: &str) -> bool {
        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }

        local.split('.').all(|atom| {
            !atom.is_empty()
                && atom
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || LOCAL_PART_SPECIAL_CHARS.contains(&c))
        })
    }

    /// Dot-separated labels; a single label such as `localhost` is accepted
    fn is_valid_domain(domain: &str) -> bool {
        domain.split('.').all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(email: impl Into<String>) -> Self {
        Self(email.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for EmailAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmailAddress::parse(s)
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
