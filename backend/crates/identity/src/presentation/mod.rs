//! Presentation Layer
//!
//! HTTP handlers, DTOs and router.

pub mod caller;
pub mod dto;
pub mod handlers;
pub mod router;

pub use caller::CallerIdentity;
pub use handlers::IdentityAppState;
pub use router::{identity_router, identity_router_generic};
