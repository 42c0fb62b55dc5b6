//! # joeview-database
//!
//! Access to the managed relational store through its REST gateway.
//! Every request made here carries the elevated service role key, so this
//! crate must only be used from trusted server-side code.

pub mod client;
pub mod error;
pub mod query;
pub mod repositories;
pub mod store;

pub use client::{GatewayClient, SelectResponse};
pub use error::GatewayError;
pub use query::SelectQuery;
pub use store::{OverviewPage, RoleStore, UserOverviewStore};
