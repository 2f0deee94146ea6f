//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.
//!
//! Every account write must advance `updated_at` to a whole second strictly
//! later than its previous value. Updates report whether a row was touched.

use platform::password::HashedSecret;

use crate::domain::entity::{
    account::{Account, NewAccount},
    role::{Permission, Role, RolePermission},
};
use crate::domain::value_object::{
    account_id::{AccountId, RoleId},
    email::EmailAddress,
};
use crate::error::IdentityResult;

/// Account repository trait
#[trait_variant::make(AccountRepository: Send)]
pub trait LocalAccountRepository {
    /// Insert a new account; duplicates surface as `StoreError::Conflict`
    async fn insert(&self, account: &NewAccount) -> IdentityResult<()>;

    async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Option<Account>>;

    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<Account>>;

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityResult<Option<Account>>;

    async fn update_password(&self, id: &AccountId, hash: &HashedSecret) -> IdentityResult<bool>;

    async fn update_username(&self, id: &AccountId, username: &str) -> IdentityResult<bool>;

    async fn update_name(
        &self,
        id: &AccountId,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool>;

    /// Username and both names in one write
    async fn update_info(
        &self,
        id: &AccountId,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool>;

    async fn update_email(&self, id: &AccountId, email: &EmailAddress) -> IdentityResult<bool>;

    async fn mark_email_verified(&self, id: &AccountId) -> IdentityResult<bool>;
}

/// Role and permission repository trait
#[trait_variant::make(RoleRepository: Send)]
pub trait LocalRoleRepository {
    /// All roles ordered by name
    async fn list_roles(&self) -> IdentityResult<Vec<Role>>;

    async fn find_role_by_name(&self, name: &str) -> IdentityResult<Option<Role>>;

    /// Roles held by the account, ordered by name
    async fn roles_for(&self, id: &AccountId) -> IdentityResult<Vec<Role>>;

    /// Distinct permissions reachable through the account's roles, ordered by name
    async fn permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<Permission>>;

    /// Account → role → permission paths ordered by role name, role id, then
    /// permission name, so each role's paths are contiguous
    async fn role_permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<RolePermission>>;

    /// Associate a role; an existing association surfaces as `StoreError::Conflict`
    async fn grant_role(&self, id: &AccountId, role_id: &RoleId) -> IdentityResult<()>;
}

/// Everything the identity core needs from the store
pub trait IdentityRepository: AccountRepository + RoleRepository + Send + Sync + 'static {}

impl<T> IdentityRepository for T where T: AccountRepository + RoleRepository + Send + Sync + 'static {}
