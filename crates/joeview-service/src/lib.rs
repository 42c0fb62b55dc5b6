//! # joeview-service
//!
//! Business logic service layer for the JoeView admin API. Services take
//! their store dependencies at construction time via `Arc` references and
//! only run on behalf of an admitted [`joeview_entity::AdminUser`].

pub mod user;

pub use user::AdminUserService;
