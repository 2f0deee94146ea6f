//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::account::PublicAccount;

// ============================================================================
// Sign Up
// ============================================================================

/// Sign up request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign up response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub account: PublicAccount,
    /// "created" or "reissued"
    pub state: String,
    /// Non-fatal problems, e.g. the default role could not be granted
    pub warnings: Vec<String>,
}

// ============================================================================
// Sign In
// ============================================================================

/// Sign in request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    /// Username, email or account id
    pub identifier: String,
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Account Updates
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SetPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetUsernameRequest {
    pub username: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetNameRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInfoRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetEmailRequest {
    pub email: String,
}

// ============================================================================
// Email Verification
// ============================================================================

/// Code delivered to the address out of band
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

// ============================================================================
// Roles and Permissions
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct RolesResponse {
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PermissionsResponse {
    pub permissions: Vec<String>,
}
