//! Error Kind - Classification of errors
//!
//! Defines the [`ErrorKind`] enum that maps to HTTP status codes.

use serde::Serialize;

/// What went wrong, independent of which domain raised it.
///
/// Each kind renders as exactly one HTTP status (RFC 9110).
///
/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Conflict.status_code(), 409);
/// assert_eq!(ErrorKind::Conflict.reason(), "Conflict");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed input or policy violation
    BadRequest,
    /// Credentials missing or wrong
    Unauthorized,
    /// Known caller, not allowed
    Forbidden,
    NotFound,
    /// Duplicates or state conflicts
    Conflict,
    /// Well-formed, but refers to something unusable
    UnprocessableEntity,
    InternalServerError,
    /// Backing store unreachable; retrying may succeed
    ServiceUnavailable,
}

impl ErrorKind {
    const fn parts(self) -> (u16, &'static str) {
        match self {
            ErrorKind::BadRequest => (400, "Bad Request"),
            ErrorKind::Unauthorized => (401, "Unauthorized"),
            ErrorKind::Forbidden => (403, "Forbidden"),
            ErrorKind::NotFound => (404, "Not Found"),
            ErrorKind::Conflict => (409, "Conflict"),
            ErrorKind::UnprocessableEntity => (422, "Unprocessable Entity"),
            ErrorKind::InternalServerError => (500, "Internal Server Error"),
            ErrorKind::ServiceUnavailable => (503, "Service Unavailable"),
        }
    }

    pub const fn status_code(self) -> u16 {
        self.parts().0
    }

    /// Standard reason phrase
    pub const fn reason(self) -> &'static str {
        self.parts().1
    }

    /// 5xx kinds; these are logged server-side and never detailed to the user
    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }

    /// The same request may succeed later
    pub const fn is_transient(self) -> bool {
        matches!(self, ErrorKind::ServiceUnavailable)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}
