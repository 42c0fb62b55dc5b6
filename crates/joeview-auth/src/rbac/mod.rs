//! Admin role-based access control.

pub mod authorizer;

pub use authorizer::{AdminAuthorizer, AdminDecision, DenialReason};
