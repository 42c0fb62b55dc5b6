//! Caller identity and auth session entities.

pub mod identity;
pub mod model;

pub use identity::CallerIdentity;
pub use model::AuthSession;
