//! Read capabilities over the elevated data store.
//!
//! Both traits are implemented by the gateway repositories and can be
//! replaced independently with in-memory fakes in tests.

use async_trait::async_trait;
use uuid::Uuid;

use joeview_core::result::AppResult;
use joeview_entity::admin::AdminRoleRow;
use joeview_entity::overview::{UserListQuery, UserOverviewRow};

/// Lookup of admin role assignments.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// First role row assigned to the user, if any.
    async fn find_role(&self, user_id: Uuid) -> AppResult<Option<AdminRoleRow>>;
}

/// One page of overview rows.
#[derive(Debug, Clone, Default)]
pub struct OverviewPage {
    /// Rows in the requested range.
    pub rows: Vec<UserOverviewRow>,
    /// Exact number of matching rows, when the store reported it.
    pub total: Option<u64>,
}

/// Filtered, sorted, paginated reads of the user overview.
#[async_trait]
pub trait UserOverviewStore: Send + Sync + 'static {
    /// Rows in the query's page window plus the total match count.
    async fn list(&self, query: &UserListQuery) -> AppResult<OverviewPage>;
}
