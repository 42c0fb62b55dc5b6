//! Admin role entities.

pub mod model;
pub mod role;

pub use model::{AdminRoleRow, AdminUser};
pub use role::AdminRole;
