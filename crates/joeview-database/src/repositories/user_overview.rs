//! User overview repository implementation.

use async_trait::async_trait;

use joeview_core::result::AppResult;
use joeview_entity::overview::{OVERVIEW_COLUMNS, UserListQuery, UserOverviewRow};

use crate::client::GatewayClient;
use crate::query::SelectQuery;
use crate::store::{OverviewPage, UserOverviewStore};

/// Repository for the precomputed user overview view.
#[derive(Debug, Clone)]
pub struct UserOverviewRepository {
    client: GatewayClient,
    view: String,
}

impl UserOverviewRepository {
    /// Create a new overview repository over the given view.
    pub fn new(client: GatewayClient, view: impl Into<String>) -> Self {
        Self {
            client,
            view: view.into(),
        }
    }

    /// Translate a list query into one select with an exact count.
    pub fn list_query(&self, query: &UserListQuery) -> SelectQuery {
        SelectQuery::new(self.view.as_str(), OVERVIEW_COLUMNS)
            .filters(query.filters())
            .order(query.sort_field())
            .offset(query.page.offset())
            .limit(query.page.limit())
            .count_exact()
    }
}

#[async_trait]
impl UserOverviewStore for UserOverviewRepository {
    async fn list(&self, query: &UserListQuery) -> AppResult<OverviewPage> {
        let response = self
            .client
            .select::<UserOverviewRow>(&self.list_query(query))
            .await?;

        Ok(OverviewPage {
            rows: response.rows,
            total: response.total,
        })
    }
}
