//! Account Entity
//!
//! The identity record: names, login aliases, credential hash and flags.

use chrono::{DateTime, Utc};
use platform::password::HashedSecret;
use serde::Serialize;

use crate::domain::value_object::{account_id::AccountId, email::EmailAddress};

/// Account entity
///
/// `updated_at` has whole-second resolution and strictly advances on every
/// write, which is what one-time codes are bound to.
#[derive(Debug, Clone)]
pub struct Account {
    /// Immutable UUID identifier
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    /// Login alias (unique), initially the email address
    pub username: String,
    /// Email address (unique)
    pub email: EmailAddress,
    pub password_hash: HashedSecret,
    pub email_verified: bool,
    pub can_sign_in: bool,
    /// Last write to the row
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Last update as seconds since the Unix epoch
    pub fn updated_at_secs(&self) -> i64 {
        self.updated_at.timestamp()
    }

    pub fn to_public(&self) -> PublicAccount {
        PublicAccount {
            id: self.id.to_string(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username: self.username.clone(),
            email: self.email.as_str().to_string(),
        }
    }
}

/// Row to insert for a new account
///
/// The store stamps `updated_at` and the flags take their column defaults
/// (unverified, allowed to sign in).
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: AccountId,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: EmailAddress,
    pub password_hash: HashedSecret,
}

impl NewAccount {
    /// New account whose username starts out as its email address
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: EmailAddress,
        password_hash: HashedSecret,
    ) -> Self {
        Self {
            id: AccountId::new(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            username: email.as_str().to_string(),
            email,
            password_hash,
        }
    }
}

/// What may be shown about an account: no hash, flags or timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicAccount {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
}
