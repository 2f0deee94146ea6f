//! Input Validators
//!
//! Pure syntax checks for passwords, usernames, display names and email
//! addresses. Each check either passes or reports one specific violation.
//!
//! ## Policy
//! - Password: empty, or at least [`MIN_PASSWORD_LENGTH`] characters drawn
//!   from ASCII letters, digits and [`PASSWORD_SPECIAL_CHARS`]
//! - Username: at least [`MIN_NAME_LENGTH`] characters of `[A-Za-z0-9_]`,
//!   `-`, `.` and `@`
//! - Display name: at least [`MIN_NAME_LENGTH`] characters of `[A-Za-z0-9_]`,
//!   `-` and space
//! - Email: username character set, then a well-formed `local@domain`

use thiserror::Error;

use crate::domain::value_object::email::EmailAddress;

// ============================================================================
// Constants
// ============================================================================

pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MIN_NAME_LENGTH: usize = 4;

/// Punctuation allowed in passwords besides letters and digits
pub const PASSWORD_SPECIAL_CHARS: &[char] = &[
    '@', '$', '!', '%', '*', '#', '?', '&', '.', '~', '^', '-',
];

const USERNAME_SPECIAL_CHARS: &[char] = &['_', '-', '.', '@'];

const NAME_SPECIAL_CHARS: &[char] = &['_', '-', ' '];

// ============================================================================
// Error Types
// ============================================================================

/// A specific policy violation; always safe to show to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("invalid password")]
    InvalidPassword,

    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },

    #[error("invalid username")]
    InvalidUsername,

    #[error("name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("invalid name")]
    InvalidName,

    /// Contains characters outside the username set
    #[error("invalid email address")]
    InvalidEmail,

    /// Allowed characters, but not a single `local@domain` address
    #[error("could not parse email")]
    UnparseableEmail,

    #[error("invalid account id")]
    InvalidAccountId,
}

// ============================================================================
// Checks
// ============================================================================

/// Make sure password meets requirements
///
/// An empty password passes: whether passwordless accounts are acceptable
/// is decided by the caller.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if !password.is_empty() && password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    if !password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SPECIAL_CHARS.contains(&c))
    {
        return Err(ValidationError::InvalidPassword);
    }

    Ok(())
}

pub fn check_username(username: &str) -> Result<(), ValidationError> {
    if username.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::UsernameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }

    if !is_username_charset(username) {
        return Err(ValidationError::InvalidUsername);
    }

    Ok(())
}

/// Check a first or last name
pub fn check_name(name: &str) -> Result<(), ValidationError> {
    if name.chars().count() < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort {
            min: MIN_NAME_LENGTH,
        });
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || NAME_SPECIAL_CHARS.contains(&c))
    {
        return Err(ValidationError::InvalidName);
    }

    Ok(())
}

/// Check an email address and return it parsed
pub fn check_email(email: &str) -> Result<EmailAddress, ValidationError> {
    if !is_username_charset(email) {
        return Err(ValidationError::InvalidEmail);
    }

    EmailAddress::parse(email)
}

fn is_username_charset(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || USERNAME_SPECIAL_CHARS.contains(&c))
}

// ============================================================================
// Tests
// ============================================================================
