//! In-memory repository for application tests
//!
//! Enforces the same unique keys as the relational schema and advances
//! `updated_at` the same way, and records every repository call by name.

use chrono::{DateTime, Duration, Utc};
use platform::password::HashedSecret;
use tokio::sync::Mutex;

use crate::domain::entity::{
    account::{Account, NewAccount},
    role::{Permission, Role, RolePermission},
};
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::{
    account_id::{AccountId, PermissionId, RoleId},
    email::EmailAddress,
};
use crate::error::{IdentityResult, StoreError};

#[derive(Default)]
struct State {
    accounts: Vec<Account>,
    roles: Vec<Role>,
    permissions: Vec<Permission>,
    account_roles: Vec<(AccountId, RoleId)>,
    role_permissions: Vec<(RoleId, PermissionId)>,
}

#[derive(Default)]
pub struct InMemoryIdentityRepository {
    state: Mutex<State>,
    calls: Mutex<Vec<&'static str>>,
    fail_grants: Mutex<bool>,
}

fn now_secs() -> DateTime<Utc> {
    DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap()
}

fn conflict(what: &str) -> StoreError {
    StoreError::Conflict(format!("duplicate key value violates unique constraint \"{what}\""))
}

impl InMemoryIdentityRepository {
    /// Repository seeded with a "Standard" role
    pub fn with_standard_role() -> Self {
        let mut repo = Self::default();
        repo.state.get_mut().roles.push(Role {
            id: RoleId::new(),
            name: "Standard".into(),
        });
        repo
    }

    pub async fn add_role(&self, name: &str, permissions: &[&str]) -> RoleId {
        let mut state = self.state.lock().await;
        let role_id = RoleId::new();
        state.roles.push(Role {
            id: role_id,
            name: name.to_string(),
        });

        for name in permissions {
            let permission_id = match state.permissions.iter().find(|p| p.name == *name) {
                Some(p) => p.id,
                None => {
                    let id = PermissionId::new();
                    state.permissions.push(Permission {
                        id,
                        name: name.to_string(),
                    });
                    id
                }
            };
            state.role_permissions.push((role_id, permission_id));
        }

        role_id
    }

    /// Make every subsequent `grant_role` fail with a store error
    pub async fn fail_grants(&self) {
        *self.fail_grants.lock().await = true;
    }

    pub async fn account_count(&self) -> usize {
        self.state.lock().await.accounts.len()
    }

    pub async fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().await.clone()
    }

    pub async fn clear_calls(&self) {
        self.calls.lock().await.clear();
    }

    pub async fn set_can_sign_in(&self, id: &AccountId, can_sign_in: bool) {
        let mut state = self.state.lock().await;
        if let Some(account) = state.accounts.iter_mut().find(|a| a.id == *id) {
            account.can_sign_in = can_sign_in;
        }
    }

    async fn record(&self, call: &'static str) {
        self.calls.lock().await.push(call);
    }

    /// Apply `f` to the account and advance its timestamp
    async fn touch<F>(&self, id: &AccountId, f: F) -> IdentityResult<bool>
    where
        F: FnOnce(&mut Account),
    {
        let mut state = self.state.lock().await;
        let Some(account) = state.accounts.iter_mut().find(|a| a.id == *id) else {
            return Ok(false);
        };

        f(account);
        account.updated_at = now_secs().max(account.updated_at + Duration::seconds(1));
        Ok(true)
    }

    async fn ensure_unique(
        &self,
        id: &AccountId,
        username: Option<&str>,
        email: Option<&EmailAddress>,
    ) -> IdentityResult<()> {
        let state = self.state.lock().await;
        for other in state.accounts.iter().filter(|a| a.id != *id) {
            if username.is_some_and(|u| other.username == u) {
                return Err(conflict("accounts_username_key").into());
            }
            if email.is_some_and(|e| other.email == *e) {
                return Err(conflict("accounts_email_key").into());
            }
        }
        Ok(())
    }
}

impl AccountRepository for InMemoryIdentityRepository {
    async fn insert(&self, account: &NewAccount) -> IdentityResult<()> {
        self.record("insert").await;
        self.ensure_unique(&account.id, Some(&account.username), Some(&account.email))
            .await?;

        self.state.lock().await.accounts.push(Account {
            id: account.id,
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            password_hash: account.password_hash.clone(),
            email_verified: false,
            can_sign_in: true,
            updated_at: now_secs(),
        });
        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Option<Account>> {
        self.record("find_by_id").await;
        let state = self.state.lock().await;
        Ok(state.accounts.iter().find(|a| a.id == *id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<Account>> {
        self.record("find_by_username").await;
        let state = self.state.lock().await;
        Ok(state.accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityResult<Option<Account>> {
        self.record("find_by_email").await;
        let state = self.state.lock().await;
        Ok(state.accounts.iter().find(|a| a.email == *email).cloned())
    }

    async fn update_password(&self, id: &AccountId, hash: &HashedSecret) -> IdentityResult<bool> {
        self.record("update_password").await;
        self.touch(id, |a| a.password_hash = hash.clone()).await
    }

    async fn update_username(&self, id: &AccountId, username: &str) -> IdentityResult<bool> {
        self.record("update_username").await;
        self.ensure_unique(id, Some(username), None).await?;
        self.touch(id, |a| a.username = username.to_string()).await
    }

    async fn update_name(
        &self,
        id: &AccountId,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool> {
        self.record("update_name").await;
        self.touch(id, |a| {
            a.first_name = first_name.to_string();
            a.last_name = last_name.to_string();
        })
        .await
    }

    async fn update_info(
        &self,
        id: &AccountId,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool> {
        self.record("update_info").await;
        self.ensure_unique(id, Some(username), None).await?;
        self.touch(id, |a| {
            a.username = username.to_string();
            a.first_name = first_name.to_string();
            a.last_name = last_name.to_string();
        })
        .await
    }

    async fn update_email(&self, id: &AccountId, email: &EmailAddress) -> IdentityResult<bool> {
        self.record("update_email").await;
        self.ensure_unique(id, None, Some(email)).await?;
        self.touch(id, |a| a.email = email.clone()).await
    }

    async fn mark_email_verified(&self, id: &AccountId) -> IdentityResult<bool> {
        self.record("mark_email_verified").await;
        self.touch(id, |a| a.email_verified = true).await
    }
}

impl RoleRepository for InMemoryIdentityRepository {
    async fn list_roles(&self) -> IdentityResult<Vec<Role>> {
        self.record("list_roles").await;
        let mut roles = self.state.lock().await.roles.clone();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn find_role_by_name(&self, name: &str) -> IdentityResult<Option<Role>> {
        self.record("find_role_by_name").await;
        let state = self.state.lock().await;
        Ok(state.roles.iter().find(|r| r.name == name).cloned())
    }

    async fn roles_for(&self, id: &AccountId) -> IdentityResult<Vec<Role>> {
        self.record("roles_for").await;
        let state = self.state.lock().await;
        let mut roles: Vec<Role> = state
            .account_roles
            .iter()
            .filter(|(account_id, _)| account_id == id)
            .filter_map(|(_, role_id)| state.roles.iter().find(|r| r.id == *role_id).cloned())
            .collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<Permission>> {
        self.record("permissions_for").await;
        let paths = self.paths(id).await;
        let mut permissions: Vec<Permission> = Vec::new();
        for path in paths {
            if !permissions.iter().any(|p| p.id == path.permission_id) {
                permissions.push(Permission {
                    id: path.permission_id,
                    name: path.permission_name,
                });
            }
        }
        permissions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(permissions)
    }

    async fn role_permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<RolePermission>> {
        self.record("role_permissions_for").await;
        Ok(self.paths(id).await)
    }

    async fn grant_role(&self, id: &AccountId, role_id: &RoleId) -> IdentityResult<()> {
        self.record("grant_role").await;
        if *self.fail_grants.lock().await {
            return Err(StoreError::Unavailable("connection reset".into()).into());
        }

        let mut state = self.state.lock().await;
        if state.account_roles.contains(&(*id, *role_id)) {
            return Err(conflict("account_roles_pkey").into());
        }
        state.account_roles.push((*id, *role_id));
        Ok(())
    }
}

impl InMemoryIdentityRepository {
    /// Paths ordered by role name, role id, then permission name
    async fn paths(&self, id: &AccountId) -> Vec<RolePermission> {
        let state = self.state.lock().await;
        let mut paths = Vec::new();

        for (_, role_id) in state.account_roles.iter().filter(|(a, _)| a == id) {
            let Some(role) = state.roles.iter().find(|r| r.id == *role_id) else {
                continue;
            };
            for (_, permission_id) in state.role_permissions.iter().filter(|(r, _)| r == role_id) {
                if let Some(permission) = state.permissions.iter().find(|p| p.id == *permission_id) {
                    paths.push(RolePermission {
                        role_id: role.id,
                        role_name: role.name.clone(),
                        permission_id: permission.id,
                        permission_name: permission.name.clone(),
                    });
                }
            }
        }

        paths.sort_by(|a, b| {
            (&a.role_name, a.role_id, &a.permission_name).cmp(&(
                &b.role_name,
                b.role_id,
                &b.permission_name,
            ))
        });
        paths
    }
}
