//! Caller Identity
//!
//! Account-scoped routes act on the authenticated caller, never on an id
//! taken from the request. Whatever authenticates the request (a session
//! middleware, a gateway) inserts a [`CallerIdentity`] into the request
//! extensions before these routes run.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::domain::value_object::account_id::AccountId;
use crate::error::IdentityError;

/// Account the current request is authenticated as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerIdentity(pub AccountId);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = IdentityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .copied()
            .ok_or(IdentityError::Unauthenticated)
    }
}
