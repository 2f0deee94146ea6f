//! Role and Permission Entities
//!
//! Roles group permissions; accounts hold roles. Permissions are only ever
//! reached through roles.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::value_object::account_id::{PermissionId, RoleId};

/// Named authorization grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
}

/// Named capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: PermissionId,
    pub name: String,
}

/// One account → role → permission path, as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermission {
    pub role_id: RoleId,
    pub role_name: String,
    pub permission_id: PermissionId,
    pub permission_name: String,
}

/// A role name with the permission names under it, ids omitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublicRoleView {
    pub name: String,
    pub permissions: Vec<String>,
}

/// Group paths ordered by (role name, permission name) into role views
///
/// A new group starts whenever the role id changes from the previous row,
/// so the input must keep each role's rows contiguous.
pub fn group_role_permissions(rows: &[RolePermission]) -> Vec<PublicRoleView> {
    let mut views: Vec<PublicRoleView> = Vec::new();
    let mut current: Option<RoleId> = None;

    for row in rows {
        match views.last_mut() {
            Some(view) if current == Some(row.role_id) => {
                view.permissions.push(row.permission_name.clone());
            }
            _ => {
                current = Some(row.role_id);
                views.push(PublicRoleView {
                    name: row.role_name.clone(),
                    permissions: vec![row.permission_name.clone()],
                });
            }
        }
    }

    views
}

/// Role name → permission names, merging groups that share a name
pub fn role_permission_map(views: &[PublicRoleView]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for view in views {
        let permissions = map.entry(view.name.clone()).or_default();
        for permission in &view.permissions {
            if !permissions.contains(permission) {
                permissions.push(permission.clone());
            }
        }
        permissions.sort();
    }

    map
}
