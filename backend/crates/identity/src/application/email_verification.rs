//! Email Verification Use Case
//!
//! Issues a one-time code for an account and accepts it back to mark the
//! email verified. Marking the account is itself a write, so a code can
//! only be used once.
//!
//! Issued codes go to the account's mailbox through the outer layer and
//! are never returned to whoever asked for them.

use crate::application::identity_store::IdentityStore;
use crate::domain::entity::account::Account;
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{
    account_id::AccountId, email::EmailAddress, one_time_code::OneTimeCode,
};
use crate::error::{IdentityError, IdentityResult};

/// Email verification use case
pub struct EmailVerificationUseCase<R> {
    store: IdentityStore<R>,
}

impl<R: IdentityRepository> EmailVerificationUseCase<R> {
    pub fn new(store: IdentityStore<R>) -> Self {
        Self { store }
    }

    /// Code valid until the account is next written to
    pub async fn issue(&self, id: &AccountId) -> IdentityResult<OneTimeCode> {
        let account = self.store.find_by_id(id).await?;
        let code = self.store.derive_otp(&account)?;

        tracing::debug!(account_id = %id, "One time code issued");
        Ok(code)
    }

    /// Check the code and mark the email verified; returns the updated account
    pub async fn verify(&self, id: &AccountId, code: &OneTimeCode) -> IdentityResult<Account> {
        let account = self.store.find_by_id(id).await?;
        self.store.verify_otp(&account, code)?;

        self.store.set_email_verified(id).await?;
        self.store.find_by_id(id).await
    }

    /// Verify by address; an unknown address fails like a wrong code
    pub async fn verify_address(
        &self,
        email: &EmailAddress,
        code: &OneTimeCode,
    ) -> IdentityResult<Account> {
        let account = match self.store.find_by_email(email).await {
            Ok(account) => account,
            Err(IdentityError::NotFound) => return Err(IdentityError::OtpExpired),
            Err(e) => return Err(e),
        };

        self.verify(&account.id, code).await
    }
}
