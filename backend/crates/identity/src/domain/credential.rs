//! Credential Codec
//!
//! Password hashing and verification, plus one-time codes bound to the
//! account's last update. A code is the salted hash of `updated_at` in
//! whole seconds, so any write to the account expires every code issued
//! before it.

use platform::password::{ClearTextSecret, HashedSecret, SecretHashError};

use crate::domain::entity::account::Account;
use crate::domain::value_object::one_time_code::OneTimeCode;
use crate::error::{IdentityError, IdentityResult};

impl From<SecretHashError> for IdentityError {
    fn from(err: SecretHashError) -> Self {
        IdentityError::Internal(err.to_string())
    }
}

/// Hashes and checks secrets with an optional application-wide pepper
#[derive(Clone, Default)]
pub struct CredentialCodec {
    pepper: Option<Vec<u8>>,
}

impl CredentialCodec {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }

    fn pepper(&self) -> Option<&[u8]> {
        self.pepper.as_deref()
    }

    pub fn hash_password(&self, password: &ClearTextSecret) -> IdentityResult<HashedSecret> {
        Ok(password.hash(self.pepper())?)
    }

    /// Any failure, including a malformed stored hash, is `CredentialMismatch`
    pub fn verify_password(
        &self,
        hash: &HashedSecret,
        password: &ClearTextSecret,
    ) -> IdentityResult<()> {
        if hash.verify(password, self.pepper()) {
            Ok(())
        } else {
            Err(IdentityError::CredentialMismatch)
        }
    }

    /// Derive a code for the account as it is now
    pub fn derive_otp(&self, account: &Account) -> IdentityResult<OneTimeCode> {
        let hashed = Self::otp_input(account).hash(self.pepper())?;
        Ok(OneTimeCode::new(hashed.as_phc_string()))
    }

    /// `OtpExpired` unless the code was derived from the current state
    pub fn verify_otp(&self, account: &Account, code: &OneTimeCode) -> IdentityResult<()> {
        let expected = HashedSecret::from_stored(code.as_str());
        if expected.verify(&Self::otp_input(account), self.pepper()) {
            Ok(())
        } else {
            Err(IdentityError::OtpExpired)
        }
    }

    fn otp_input(account: &Account) -> ClearTextSecret {
        ClearTextSecret::new(account.updated_at_secs().to_string())
    }
}

impl std::fmt::Debug for CredentialCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialCodec")
            .field("peppered", &self.pepper.is_some())
            .finish()
    }
}
