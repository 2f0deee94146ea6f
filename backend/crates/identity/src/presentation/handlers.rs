//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::{
    EmailVerificationUseCase, IdentityConfig, IdentityStore, RegistrationInput, RegistrationState,
    RegistrationUseCase, SignInInput, SignInUseCase,
};
use crate::domain::entity::{account::PublicAccount, role::PublicRoleView};
use crate::domain::repository::IdentityRepository;
use crate::domain::value_object::{email::EmailAddress, one_time_code::OneTimeCode};
use crate::error::IdentityResult;
use crate::presentation::caller::CallerIdentity;
use crate::presentation::dto::{
    PermissionsResponse, RolesResponse, SetEmailRequest, SetInfoRequest, SetNameRequest,
    SetPasswordRequest, SetUsernameRequest, SignInRequest, SignUpRequest, SignUpResponse,
    VerifyEmailRequest,
};

/// Shared state for identity handlers
pub struct IdentityAppState<R> {
    pub store: IdentityStore<R>,
    pub config: Arc<IdentityConfig>,
}

impl<R> Clone for IdentityAppState<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Sign Up / Sign In
// ============================================================================

/// POST /signup
///
/// 201 when a new account was created, 200 when an unverified one was reissued.
pub async fn sign_up<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    Json(req): Json<SignUpRequest>,
) -> IdentityResult<impl IntoResponse> {
    let use_case = RegistrationUseCase::new(state.store.clone(), state.config.clone());

    let outcome = use_case
        .execute(RegistrationInput {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
        })
        .await?;

    let status = match outcome.state {
        RegistrationState::Created => StatusCode::CREATED,
        RegistrationState::Reissued => StatusCode::OK,
    };

    Ok((
        status,
        Json(SignUpResponse {
            account: outcome.account.to_public(),
            state: outcome.state.to_string(),
            warnings: outcome.warnings.iter().map(ToString::to_string).collect(),
        }),
    ))
}

/// POST /signin
pub async fn sign_in<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    Json(req): Json<SignInRequest>,
) -> IdentityResult<Json<PublicAccount>> {
    let use_case = SignInUseCase::new(state.store.clone(), state.config.clone());

    let account = use_case
        .execute(SignInInput {
            identifier: req.identifier,
            password: req.password,
        })
        .await?;

    Ok(Json(account.to_public()))
}

// ============================================================================
// Account
// ============================================================================

/// GET /me
pub async fn me<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
) -> IdentityResult<Json<PublicAccount>> {
    let account = state.store.find_by_id(&id).await?;
    Ok(Json(account.to_public()))
}

/// PUT /me/password
pub async fn set_password<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
    Json(req): Json<SetPasswordRequest>,
) -> IdentityResult<StatusCode> {
    state.store.set_password(&id, &req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /me/username
pub async fn set_username<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
    Json(req): Json<SetUsernameRequest>,
) -> IdentityResult<StatusCode> {
    state.store.set_username(&id, &req.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /me/name
pub async fn set_name<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
    Json(req): Json<SetNameRequest>,
) -> IdentityResult<StatusCode> {
    state
        .store
        .set_name(&id, &req.first_name, &req.last_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /me/info
pub async fn set_info<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
    Json(req): Json<SetInfoRequest>,
) -> IdentityResult<StatusCode> {
    state
        .store
        .set_user_info(&id, &req.username, &req.first_name, &req.last_name)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /me/email
pub async fn set_email<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
    Json(req): Json<SetEmailRequest>,
) -> IdentityResult<StatusCode> {
    state.store.set_email(&id, &req.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Email Verification
// ============================================================================

/// POST /verify-email
///
/// The code reaches the owner out of band (mail); it is never issued over
/// this router. An unknown address fails exactly like a wrong code.
pub async fn verify_email<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    Json(req): Json<VerifyEmailRequest>,
) -> IdentityResult<Json<PublicAccount>> {
    let email = EmailAddress::parse(&req.email)?;
    let use_case = EmailVerificationUseCase::new(state.store.clone());
    let account = use_case
        .verify_address(&email, &OneTimeCode::new(req.code))
        .await?;

    Ok(Json(account.to_public()))
}

// ============================================================================
// Roles and Permissions
// ============================================================================

/// GET /me/roles
pub async fn roles<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
) -> IdentityResult<Json<RolesResponse>> {
    let roles = state.store.role_names(&id).await?;
    Ok(Json(RolesResponse { roles }))
}

/// GET /me/permissions
pub async fn permissions<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
) -> IdentityResult<Json<PermissionsResponse>> {
    let permissions = state.store.permission_names(&id).await?;
    Ok(Json(PermissionsResponse { permissions }))
}

/// GET /me/role-permissions
pub async fn role_permissions<R: IdentityRepository>(
    State(state): State<IdentityAppState<R>>,
    CallerIdentity(id): CallerIdentity,
) -> IdentityResult<Json<Vec<PublicRoleView>>> {
    let views = state.store.public_role_permission_view(&id).await?;
    Ok(Json(views))
}
