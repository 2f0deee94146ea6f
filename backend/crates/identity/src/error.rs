//! Identity Error Types
//!
//! This module provides identity-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::validation::ValidationError;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Malformed input or policy violation; the reason is safe to show
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No matching account
    #[error("Account not found")]
    NotFound,

    /// Password verification failed (never says why)
    #[error("Credentials do not match")]
    CredentialMismatch,

    /// One-time code no longer matches the account state
    #[error("One time code has expired")]
    OtpExpired,

    /// Email already registered and verified
    #[error("User already registered")]
    AlreadyRegistered,

    /// Role name unknown to the store
    #[error("{0} role not available")]
    RoleUnavailable(String),

    /// Account exists but may not sign in
    #[error("Account is disabled")]
    AccountDisabled,

    /// Account-scoped request without an authenticated caller
    #[error("Sign in required")]
    Unauthenticated,

    /// Relational store failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures reported by the relational store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique or foreign-key constraint rejected the write
    #[error("Store constraint violation: {0}")]
    Conflict(String),

    /// Connectivity failure; the only retryable class
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A row could not be mapped to a domain value
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    // Class 23: integrity constraint violation
                    Some("23000" | "23001" | "23503" | "23505") => {
                        StoreError::Conflict(db_err.message().to_string())
                    }
                    // Class 53: insufficient resources, class 57: operator intervention
                    Some(
                        "53000" | "53100" | "53200" | "53300" | "57000" | "57014" | "57P01"
                        | "57P02" | "57P03",
                    ) => StoreError::Unavailable(db_err.message().to_string()),
                    _ => StoreError::Other(err.to_string()),
                }
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Corrupt(err.to_string())
            }
            _ => StoreError::Other(err.to_string()),
        }
    }
}

impl From<sqlx::Error> for IdentityError {
    fn from(err: sqlx::Error) -> Self {
        IdentityError::Store(err.into())
    }
}

impl IdentityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::Validation(_) => ErrorKind::BadRequest,
            IdentityError::NotFound => ErrorKind::NotFound,
            IdentityError::CredentialMismatch
            | IdentityError::OtpExpired
            | IdentityError::Unauthenticated => ErrorKind::Unauthorized,
            IdentityError::AlreadyRegistered => ErrorKind::Conflict,
            IdentityError::RoleUnavailable(_) => ErrorKind::UnprocessableEntity,
            IdentityError::AccountDisabled => ErrorKind::Forbidden,
            IdentityError::Store(StoreError::Conflict(_)) => ErrorKind::Conflict,
            IdentityError::Store(StoreError::Unavailable(_)) => ErrorKind::ServiceUnavailable,
            IdentityError::Store(_) | IdentityError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// True only for store connectivity failures
    pub fn is_retryable(&self) -> bool {
        self.kind().is_transient()
    }

    /// Convert to AppError
    ///
    /// Store and internal details are kept as the source, not in the message.
    pub fn into_app_error(self) -> AppError {
        let kind = self.kind();
        match self {
            IdentityError::AlreadyRegistered => AppError::new(kind, self.to_string())
                .with_action("Please sign up with another email address"),
            IdentityError::Store(e @ StoreError::Conflict(_)) => {
                AppError::conflict("The request conflicts with an existing record").with_source(e)
            }
            IdentityError::Store(e @ StoreError::Unavailable(_)) => {
                AppError::service_unavailable("Identity store unavailable")
                    .with_action("Please try again later")
                    .with_source(e)
            }
            IdentityError::Store(e) => AppError::internal("Internal error").with_source(e),
            IdentityError::Internal(msg) => AppError::internal("Internal error").with_source(msg),
            other => AppError::new(kind, other.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Store(e) => {
                tracing::error!(error = %e, retryable = e.is_retryable(), "Identity store error");
            }
            IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::CredentialMismatch | IdentityError::OtpExpired => {
                tracing::warn!(error = %self, "Credential check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}
