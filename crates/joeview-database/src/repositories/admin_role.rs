//! Admin role repository implementation.

use async_trait::async_trait;
use uuid::Uuid;

use joeview_core::types::{Filter, FilterField};
use joeview_core::result::AppResult;
use joeview_entity::admin::AdminRoleRow;

use crate::client::GatewayClient;
use crate::query::SelectQuery;
use crate::store::RoleStore;

/// Repository for the admin role assignment table.
#[derive(Debug, Clone)]
pub struct AdminRoleRepository {
    client: GatewayClient,
    table: String,
}

impl AdminRoleRepository {
    /// Create a new role repository over the given table.
    pub fn new(client: GatewayClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// The select issued for a user's role.
    pub fn role_query(&self, user_id: Uuid) -> SelectQuery {
        SelectQuery::new(self.table.as_str(), &["role"])
            .filter(Filter::Field(FilterField::eq("user_id", user_id.to_string())))
            .limit(1)
    }
}

#[async_trait]
impl RoleStore for AdminRoleRepository {
    async fn find_role(&self, user_id: Uuid) -> AppResult<Option<AdminRoleRow>> {
        let response = self
            .client
            .select::<AdminRoleRow>(&self.role_query(user_id))
            .await?;

        Ok(response.rows.into_iter().next())
    }
}
