//! # joeview-core
//!
//! Core crate for the JoeView admin API. Contains configuration schemas,
//! pagination/sorting/filter types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other JoeView crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
