//! User overview entities and the list query over them.

pub mod model;
pub mod query;
pub mod sort;

pub use model::{OVERVIEW_COLUMNS, UserOverview, UserOverviewRow};
pub use query::UserListQuery;
pub use sort::UserSort;
