//! # joeview-auth
//!
//! Caller authentication and admin authorization for the JoeView admin API.
//!
//! ## Modules
//!
//! - `session` - auth cookie codec and per-request session resolution
//! - `identity` - identity provider capability and its GoTrue client
//! - `rbac` - admin role check against the role assignment table

pub mod identity;
pub mod rbac;
pub mod session;

pub use identity::{GoTrueIdentityProvider, IdentityProvider};
pub use rbac::{AdminAuthorizer, AdminDecision, DenialReason};
pub use session::{AuthCookieCodec, Caller, CookieUpdates, ResolvedSession, SessionResolver};
