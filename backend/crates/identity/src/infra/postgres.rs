//! PostgreSQL Repository Implementation
//!
//! Expects the following tables (created outside this crate):
//!
//! ```sql
//! accounts (
//!     id UUID PRIMARY KEY, first_name TEXT, last_name TEXT,
//!     username TEXT UNIQUE, email TEXT UNIQUE, password_hash TEXT,
//!     email_verified BOOLEAN, can_sign_in BOOLEAN, updated_at TIMESTAMPTZ
//! )
//! roles (id UUID PRIMARY KEY, name TEXT UNIQUE)
//! permissions (id UUID PRIMARY KEY, name TEXT UNIQUE)
//! account_roles (account_id UUID, role_id UUID, PRIMARY KEY (account_id, role_id))
//! role_permissions (role_id UUID, permission_id UUID, PRIMARY KEY (role_id, permission_id))
//! ```

use chrono::{DateTime, Utc};
use platform::password::HashedSecret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    account::{Account, NewAccount},
    role::{Permission, Role, RolePermission},
};
use crate::domain::repository::{AccountRepository, RoleRepository};
use crate::domain::value_object::{
    account_id::{AccountId, PermissionId, RoleId},
    email::EmailAddress,
};
use crate::error::IdentityResult;

const ACCOUNT_COLUMNS: &str = r#"
    id,
    first_name,
    last_name,
    username,
    email,
    password_hash,
    email_verified,
    can_sign_in,
    updated_at
"#;

/// Whole seconds, and always later than the previous stamp
const BUMP_UPDATED_AT: &str =
    "updated_at = GREATEST(date_trunc('second', now()), updated_at + INTERVAL '1 second')";

/// PostgreSQL-backed identity repository
#[derive(Clone)]
pub struct PgIdentityRepository {
    pool: PgPool,
}

impl PgIdentityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_account_where(
        &self,
        column: &str,
        bind: AccountKey<'_>,
    ) -> IdentityResult<Option<Account>> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = $1");
        let query = sqlx::query_as::<_, AccountRow>(&sql);
        let query = match bind {
            AccountKey::Id(id) => query.bind(id),
            AccountKey::Text(text) => query.bind(text),
        };

        let row = query.fetch_optional(&self.pool).await?;
        Ok(row.map(AccountRow::into_account))
    }

    /// Run an account UPDATE whose `SET` list is `assignments`, with `id` as `$1`
    async fn update_account(
        &self,
        assignments: &str,
        id: &AccountId,
        binds: &[&str],
    ) -> IdentityResult<bool> {
        let sql = format!("UPDATE accounts SET {assignments}, {BUMP_UPDATED_AT} WHERE id = $1");
        let mut query = sqlx::query(&sql).bind(*id.as_uuid());
        for value in binds {
            query = query.bind(*value);
        }

        let affected = query.execute(&self.pool).await?.rows_affected();
        Ok(affected > 0)
    }
}

enum AccountKey<'a> {
    Id(Uuid),
    Text(&'a str),
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgIdentityRepository {
    async fn insert(&self, account: &NewAccount) -> IdentityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id,
                first_name,
                last_name,
                username,
                email,
                password_hash,
                email_verified,
                can_sign_in,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, FALSE, TRUE, date_trunc('second', now()))
            "#,
        )
        .bind(account.id.as_uuid())
        .bind(account.first_name.as_str())
        .bind(account.last_name.as_str())
        .bind(account.username.as_str())
        .bind(account.email.as_str())
        .bind(account.password_hash.as_phc_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &AccountId) -> IdentityResult<Option<Account>> {
        self.find_account_where("id", AccountKey::Id(*id.as_uuid()))
            .await
    }

    async fn find_by_username(&self, username: &str) -> IdentityResult<Option<Account>> {
        self.find_account_where("username", AccountKey::Text(username))
            .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> IdentityResult<Option<Account>> {
        self.find_account_where("email", AccountKey::Text(email.as_str()))
            .await
    }

    async fn update_password(&self, id: &AccountId, hash: &HashedSecret) -> IdentityResult<bool> {
        self.update_account("password_hash = $2", id, &[hash.as_phc_string()])
            .await
    }

    async fn update_username(&self, id: &AccountId, username: &str) -> IdentityResult<bool> {
        self.update_account("username = $2", id, &[username]).await
    }

    async fn update_name(
        &self,
        id: &AccountId,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool> {
        self.update_account(
            "first_name = $2, last_name = $3",
            id,
            &[first_name, last_name],
        )
        .await
    }

    async fn update_info(
        &self,
        id: &AccountId,
        username: &str,
        first_name: &str,
        last_name: &str,
    ) -> IdentityResult<bool> {
        self.update_account(
            "username = $2, first_name = $3, last_name = $4",
            id,
            &[username, first_name, last_name],
        )
        .await
    }

    async fn update_email(&self, id: &AccountId, email: &EmailAddress) -> IdentityResult<bool> {
        self.update_account("email = $2", id, &[email.as_str()])
            .await
    }

    async fn mark_email_verified(&self, id: &AccountId) -> IdentityResult<bool> {
        self.update_account("email_verified = TRUE", id, &[]).await
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgIdentityRepository {
    async fn list_roles(&self) -> IdentityResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM roles ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(NamedRow::into_role).collect())
    }

    async fn find_role_by_name(&self, name: &str) -> IdentityResult<Option<Role>> {
        let row = sqlx::query_as::<_, NamedRow>("SELECT id, name FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(NamedRow::into_role))
    }

    async fn roles_for(&self, id: &AccountId) -> IdentityResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            r#"
            SELECT r.id, r.name
            FROM account_roles ar
            JOIN roles r ON r.id = ar.role_id
            WHERE ar.account_id = $1
            ORDER BY r.name
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NamedRow::into_role).collect())
    }

    async fn permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, NamedRow>(
            r#"
            SELECT DISTINCT p.id, p.name
            FROM account_roles ar
            JOIN role_permissions rp ON rp.role_id = ar.role_id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ar.account_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(NamedRow::into_permission).collect())
    }

    async fn role_permissions_for(&self, id: &AccountId) -> IdentityResult<Vec<RolePermission>> {
        let rows = sqlx::query_as::<_, RolePermissionRow>(
            r#"
            SELECT DISTINCT
                r.id AS role_id,
                r.name AS role_name,
                p.id AS permission_id,
                p.name AS permission_name
            FROM account_roles ar
            JOIN roles r ON r.id = ar.role_id
            JOIN role_permissions rp ON rp.role_id = r.id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ar.account_id = $1
            ORDER BY r.name, r.id, p.name
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RolePermissionRow::into_path).collect())
    }

    async fn grant_role(&self, id: &AccountId, role_id: &RoleId) -> IdentityResult<()> {
        sqlx::query("INSERT INTO account_roles (account_id, role_id) VALUES ($1, $2)")
            .bind(id.as_uuid())
            .bind(role_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    username: String,
    email: String,
    password_hash: String,
    email_verified: bool,
    can_sign_in: bool,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> Account {
        Account {
            id: AccountId::from_uuid(self.id),
            first_name: self.first_name,
            last_name: self.last_name,
            username: self.username,
            email: EmailAddress::from_db(self.email),
            password_hash: HashedSecret::from_stored(self.password_hash),
            email_verified: self.email_verified,
            can_sign_in: self.can_sign_in,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct NamedRow {
    id: Uuid,
    name: String,
}

impl NamedRow {
    fn into_role(self) -> Role {
        Role {
            id: RoleId::from_uuid(self.id),
            name: self.name,
        }
    }

    fn into_permission(self) -> Permission {
        Permission {
            id: PermissionId::from_uuid(self.id),
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct RolePermissionRow {
    role_id: Uuid,
    role_name: String,
    permission_id: Uuid,
    permission_name: String,
}

impl RolePermissionRow {
    fn into_path(self) -> RolePermission {
        RolePermission {
            role_id: RoleId::from_uuid(self.role_id),
            role_name: self.role_name,
            permission_id: PermissionId::from_uuid(self.permission_id),
            permission_name: self.permission_name,
        }
    }
}
