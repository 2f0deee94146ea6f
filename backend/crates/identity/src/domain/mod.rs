//! Domain Layer
//!
//! Contains validators, entities, value objects, the credential codec and
//! repository traits.

pub mod credential;
pub mod entity;
pub mod repository;
pub mod validation;
pub mod value_object;

// Re-exports
pub use credential::CredentialCodec;
pub use entity::{
    account::{Account, NewAccount, PublicAccount},
    role::{Permission, PublicRoleView, Role, RolePermission},
};
pub use repository::{AccountRepository, IdentityRepository, RoleRepository};
pub use validation::ValidationError;
pub use value_object::{
    account_id::AccountId, email::EmailAddress, one_time_code::OneTimeCode,
};
