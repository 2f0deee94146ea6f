//! One Time Code Value Object
//!
//! The code handed to an account holder for out-of-band confirmation.
//! It is only meaningful against the account state it was derived from.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque one-time code
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OneTimeCode(String);

impl OneTimeCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for OneTimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OneTimeCode").field(&"[REDACTED]").finish()
    }
}
