//! User-related services.

pub mod admin;

pub use admin::AdminUserService;
