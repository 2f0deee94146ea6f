//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod email_verification;
pub mod identity_store;
pub mod registration;
pub mod resolver;
pub mod sign_in;

#[cfg(test)]
pub(crate) mod fake;

// Re-exports
pub use config::IdentityConfig;
pub use email_verification::EmailVerificationUseCase;
pub use identity_store::IdentityStore;
pub use registration::{
    RegistrationInput, RegistrationOutcome, RegistrationState, RegistrationUseCase,
    RegistrationWarning,
};
pub use resolver::{IdentityResolver, LookupStrategy};
pub use sign_in::{SignInInput, SignInUseCase};
