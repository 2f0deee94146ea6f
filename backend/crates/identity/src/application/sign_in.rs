//! Sign In Use Case
//!
//! Checks an identifier and password pair. Issuing a session for the
//! returned account is left to the caller.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::identity_store::IdentityStore;
use crate::application::resolver::IdentityResolver;
use crate::domain::entity::account::Account;
use crate::domain::repository::IdentityRepository;
use crate::error::{IdentityError, IdentityResult};

/// Sign in input
pub struct SignInInput {
    /// Username, email or account id
    pub identifier: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<R> {
    store: IdentityStore<R>,
    resolver: IdentityResolver<R>,
    config: Arc<IdentityConfig>,
}

impl<R: IdentityRepository> SignInUseCase<R> {
    pub fn new(store: IdentityStore<R>, config: Arc<IdentityConfig>) -> Self {
        Self {
            resolver: IdentityResolver::new(store.clone()),
            store,
            config,
        }
    }

    /// Unknown identifiers and wrong passwords both yield `CredentialMismatch`
    pub async fn execute(&self, input: SignInInput) -> IdentityResult<Account> {
        if input.password.is_empty() && !self.config.allow_passwordless_sign_in {
            return Err(IdentityError::CredentialMismatch);
        }

        let account = match self.resolver.resolve(&input.identifier).await {
            Ok(account) => account,
            Err(IdentityError::NotFound) => return Err(IdentityError::CredentialMismatch),
            Err(e) => return Err(e),
        };

        self.store.verify_password(&account, &input.password)?;

        // Only reveal the flag to someone who knows the password
        if !account.can_sign_in {
            return Err(IdentityError::AccountDisabled);
        }

        tracing::info!(account_id = %account.id, "Signed in");

        Ok(account)
    }
}
