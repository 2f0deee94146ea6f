//! Identity Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Validators, entities, credential codec, repository traits
//! - `application/` - Identity store, resolver and use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Signup with retry for unverified email addresses
//! - Sign in by username, email or account id
//! - One-time codes for email verification
//! - Role and permission views for authorization checks
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, fresh salt per hash, optional pepper
//! - One-time codes expire on any write to the account
//! - Sign in does not reveal whether an account exists

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::IdentityConfig;
pub use error::{IdentityError, IdentityResult, StoreError};
pub use infra::postgres::PgIdentityRepository;
pub use presentation::{caller::CallerIdentity, router::identity_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
