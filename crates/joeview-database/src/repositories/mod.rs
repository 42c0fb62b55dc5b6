//! Gateway-backed repository implementations.

pub mod admin_role;
pub mod user_overview;

pub use admin_role::AdminRoleRepository;
pub use user_overview::UserOverviewRepository;
