//! Identity Store
//!
//! Named operations over the account and role repositories. Every write
//! validates its input first; every lookup reports a missing row as
//! `IdentityError::NotFound`.

use std::collections::BTreeMap;
use std::sync::Arc;

use platform::password::ClearTextSecret;

use crate::application::config::IdentityConfig;
use crate::domain::credential::CredentialCodec;
use crate::domain::entity::{
    account::{Account, NewAccount},
    role::{self, Permission, PublicRoleView, Role},
};
use crate::domain::repository::IdentityRepository;
use crate::domain::validation::{check_email, check_name, check_password, check_username};
use crate::domain::value_object::{
    account_id::{AccountId, parse_account_id},
    email::EmailAddress,
    one_time_code::OneTimeCode,
};
use crate::error::{IdentityError, IdentityResult};

/// Store capability object shared by the workflows
pub struct IdentityStore<R> {
    repo: Arc<R>,
    codec: CredentialCodec,
}

impl<R> Clone for IdentityStore<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            codec: self.codec.clone(),
        }
    }
}

impl<R: IdentityRepository> IdentityStore<R> {
    pub fn new(repo: Arc<R>, config: &IdentityConfig) -> Self {
        Self {
            repo,
            codec: CredentialCodec::new(config.password_pepper.clone()),
        }
    }

    pub fn codec(&self) -> &CredentialCodec {
        &self.codec
    }

    // ------------------------------------------------------------------------
    // Creation and lookup
    // ------------------------------------------------------------------------

    /// Insert a new account (username = email) and read it back
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &EmailAddress,
        password: &str,
    ) -> IdentityResult<Account> {
        check_password(password)?;

        let hash = self.codec.hash_password(&ClearTextSecret::new(password))?;
        let new_account = NewAccount::new(first_name, last_name, email.clone(), hash);
        self.repo.insert(&new_account).await?;

        tracing::info!(account_id = %new_account.id, "Account created");

        self.find_by_id(&new_account.id).await
    }

    pub async fn find_by_email(&self, email: &EmailAddress) -> IdentityResult<Account> {
        self.repo
            .find_by_email(email)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    /// Rejects a malformed username without touching the store
    pub async fn find_by_username(&self, username: &str) -> IdentityResult<Account> {
        check_username(username)?;

        self.repo
            .find_by_username(username)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    pub async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Account> {
        self.repo.find_by_id(id).await?.ok_or(IdentityError::NotFound)
    }

    /// Look up by the textual UUID form
    pub async fn find_by_uuid(&self, raw: &str) -> IdentityResult<Account> {
        let id = parse_account_id(raw)?;
        self.find_by_id(&id).await
    }

    // ------------------------------------------------------------------------
    // Setters (each advances updated_at)
    // ------------------------------------------------------------------------

    pub async fn set_password(&self, id: &AccountId, password: &str) -> IdentityResult<()> {
        check_password(password)?;

        let hash = self.codec.hash_password(&ClearTextSecret::new(password))?;
        Self::touched(self.repo.update_password(id, &hash).await?)?;

        tracing::info!(account_id = %id, "Password changed");
        Ok(())
    }

    pub async fn set_username(&self, id: &AccountId, username: &str) -> IdentityResult<()> {
        check_username(username)?;
        Self::touched(self.repo.update_username(id, username).await?)
    }

    pub async fn set_name(
        &self,
        id: &AccountId,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<()> {
        check_name(first_name)?;
        check_name(last_name)?;
        Self::touched(self.repo.update_name(id, first_name, last_name).await?)
    }

    pub async fn set_user_info(
        &self,
        id: &AccountId,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<()> {
        check_username(username)?;
        check_name(first_name)?;
        check_name(last_name)?;
        Self::touched(
            self.repo
                .update_info(id, username, first_name, last_name)
                .await?,
        )
    }

    pub async fn set_email(&self, id: &AccountId, email: &str) -> IdentityResult<()> {
        let email = check_email(email)?;
        self.set_email_address(id, &email).await
    }

    /// Write an already-parsed address
    pub async fn set_email_address(
        &self,
        id: &AccountId,
        email: &EmailAddress,
    ) -> IdentityResult<()> {
        Self::touched(self.repo.update_email(id, email).await?)
    }

    /// Idempotent; repeating it still advances the timestamp
    pub async fn set_email_verified(&self, id: &AccountId) -> IdentityResult<()> {
        Self::touched(self.repo.mark_email_verified(id).await?)?;

        tracing::info!(account_id = %id, "Email verified");
        Ok(())
    }

    fn touched(updated: bool) -> IdentityResult<()> {
        if updated {
            Ok(())
        } else {
            Err(IdentityError::NotFound)
        }
    }

    // ------------------------------------------------------------------------
    // Credentials
    // ------------------------------------------------------------------------

    pub fn verify_password(&self, account: &Account, password: &str) -> IdentityResult<()> {
        self.codec
            .verify_password(&account.password_hash, &ClearTextSecret::new(password))
    }

    pub fn derive_otp(&self, account: &Account) -> IdentityResult<OneTimeCode> {
        self.codec.derive_otp(account)
    }

    pub fn verify_otp(&self, account: &Account, code: &OneTimeCode) -> IdentityResult<()> {
        self.codec.verify_otp(account, code)
    }

    // ------------------------------------------------------------------------
    // Roles and permissions
    // ------------------------------------------------------------------------

    pub async fn list_roles(&self) -> IdentityResult<Vec<Role>> {
        self.repo.list_roles().await
    }

    pub async fn role_by_name(&self, name: &str) -> IdentityResult<Role> {
        self.repo
            .find_role_by_name(name)
            .await?
            .ok_or(IdentityError::NotFound)
    }

    pub async fn roles_for(&self, id: &AccountId) -> IdentityResult<Vec<Role>> {
        self.repo.roles_for(id).await
    }

    pub async fn permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<Permission>> {
        self.repo.permissions_for(id).await
    }

    pub async fn role_names(&self, id: &AccountId) -> IdentityResult<Vec<String>> {
        Ok(self.roles_for(id).await?.into_iter().map(|r| r.name).collect())
    }

    pub async fn permission_names(&self, id: &AccountId) -> IdentityResult<Vec<String>> {
        Ok(self
            .permissions_for(id)
            .await?
            .into_iter()
            .map(|p| p.name)
            .collect())
    }

    /// Role views in role-name order, permissions in name order within each
    pub async fn public_role_permission_view(
        &self,
        id: &AccountId,
    ) -> IdentityResult<Vec<PublicRoleView>> {
        let rows = self.repo.role_permissions_for(id).await?;
        Ok(role::group_role_permissions(&rows))
    }

    pub async fn role_permission_map(
        &self,
        id: &AccountId,
    ) -> IdentityResult<BTreeMap<String, Vec<String>>> {
        let views = self.public_role_permission_view(id).await?;
        Ok(role::role_permission_map(&views))
    }

    /// Associate a role by name
    ///
    /// An unknown name is `RoleUnavailable`; an existing association is
    /// a store conflict.
    pub async fn grant_role(&self, id: &AccountId, role_name: &str) -> IdentityResult<()> {
        let role = match self.role_by_name(role_name).await {
            Ok(role) => role,
            Err(IdentityError::NotFound) => {
                return Err(IdentityError::RoleUnavailable(role_name.to_string()));
            }
            Err(e) => return Err(e),
        };

        self.repo.grant_role(id, &role.id).await?;

        tracing::info!(account_id = %id, role = %role.name, "Role granted");
        Ok(())
    }
}
