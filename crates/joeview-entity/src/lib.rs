//! # joeview-entity
//!
//! Domain models shared by the JoeView crates: the resolved caller and
//! their auth session, admin role assignments, and the user overview
//! projection together with the list query over it.

pub mod admin;
pub mod overview;
pub mod session;

pub use admin::{AdminRole, AdminUser};
pub use overview::{UserListQuery, UserOverview, UserOverviewRow, UserSort};
pub use session::{AuthSession, CallerIdentity};
