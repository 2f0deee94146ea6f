//! Account Identifier
//!
//! Accounts, roles and permissions are keyed by UUID v4 via the kernel's
//! typed [`Id`](kernel::id::Id).

pub use kernel::id::{AccountId, PermissionId, RoleId};

use crate::domain::validation::ValidationError;

/// Parse a caller-supplied account id
pub fn parse_account_id(raw: &str) -> Result<AccountId, ValidationError> {
    AccountId::parse_str(raw).map_err(|_| ValidationError::InvalidAccountId)
}
