//! Registration Use Case
//!
//! Signs an email address up, or lets an unverified signup be retried.
//!
//! ## Outcomes
//! - No account for the email: a new one is created (`Created`)
//! - Account exists and is verified: `IdentityError::AlreadyRegistered`
//! - Account exists but is unverified: its password is replaced with the
//!   new one (`Reissued`), so nobody can lock the owner out by signing up
//!   first and never verifying
//!
//! The default role is granted in both success cases. Failing to grant it
//! does not fail the registration; it is returned as a warning.

use std::sync::Arc;

use crate::application::config::IdentityConfig;
use crate::application::identity_store::IdentityStore;
use crate::domain::entity::account::Account;
use crate::domain::repository::IdentityRepository;
use crate::domain::validation::{check_email, check_password};
use crate::error::{IdentityError, IdentityResult};

/// Registration input
pub struct RegistrationInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// How a successful registration ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum RegistrationState {
    #[display("created")]
    Created,
    #[display("reissued")]
    Reissued,
}

/// Non-fatal problem encountered after the account was settled
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RegistrationWarning {
    #[display("{role} role could not be granted: {reason}")]
    RoleNotGranted { role: String, reason: String },
}

/// Registration output
#[derive(Debug)]
pub struct RegistrationOutcome {
    pub account: Account,
    pub state: RegistrationState,
    pub warnings: Vec<RegistrationWarning>,
}

/// Registration use case
pub struct RegistrationUseCase<R> {
    store: IdentityStore<R>,
    config: Arc<IdentityConfig>,
}

impl<R: IdentityRepository> RegistrationUseCase<R> {
    pub fn new(store: IdentityStore<R>, config: Arc<IdentityConfig>) -> Self {
        Self { store, config }
    }

    pub async fn execute(&self, input: RegistrationInput) -> IdentityResult<RegistrationOutcome> {
        check_password(&input.password)?;
        let email = check_email(&input.email)?;

        let existing = match self.store.find_by_email(&email).await {
            Ok(account) => Some(account),
            Err(IdentityError::NotFound) => None,
            Err(e) => return Err(e),
        };

        let (account, state) = match existing {
            None => {
                let account = self
                    .store
                    .create_account(&input.first_name, &input.last_name, &email, &input.password)
                    .await?;
                (account, RegistrationState::Created)
            }
            Some(account) if account.email_verified => {
                tracing::info!(account_id = %account.id, "Signup rejected, email already verified");
                return Err(IdentityError::AlreadyRegistered);
            }
            Some(account) => {
                self.store.set_password(&account.id, &input.password).await?;
                let account = self.store.find_by_id(&account.id).await?;

                tracing::info!(account_id = %account.id, "Unverified signup reissued");
                (account, RegistrationState::Reissued)
            }
        };

        let warnings = self.ensure_default_role(&account, state).await;

        Ok(RegistrationOutcome {
            account,
            state,
            warnings,
        })
    }

    async fn ensure_default_role(
        &self,
        account: &Account,
        state: RegistrationState,
    ) -> Vec<RegistrationWarning> {
        let role = &self.config.default_role;

        let result = match state {
            RegistrationState::Created => self.store.grant_role(&account.id, role).await,
            RegistrationState::Reissued => match self.store.role_names(&account.id).await {
                Ok(names) if names.iter().any(|n| n == role) => Ok(()),
                Ok(_) => self.store.grant_role(&account.id, role).await,
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(()) => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    account_id = %account.id,
                    role = %role,
                    error = %e,
                    "Default role not granted"
                );
                vec![RegistrationWarning::RoleNotGranted {
                    role: role.clone(),
                    reason: e.to_string(),
                }]
            }
        }
    }
}
