//! Admin user listing over the user overview.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info};

use joeview_core::error::AppError;
use joeview_core::types::pagination::PageResponse;
use joeview_database::store::UserOverviewStore;
use joeview_entity::admin::AdminUser;
use joeview_entity::overview::{UserListQuery, UserOverview};

/// Read-only user administration.
#[derive(Clone)]
pub struct AdminUserService {
    /// Elevated overview store.
    overview: Arc<dyn UserOverviewStore>,
}

impl fmt::Debug for AdminUserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminUserService").finish_non_exhaustive()
    }
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(overview: Arc<dyn UserOverviewStore>) -> Self {
        Self { overview }
    }

    /// Lists users matching the query, one page at a time.
    ///
    /// A store failure yields no rows at all; its message is carried in
    /// the error details.
    pub async fn list_users(
        &self,
        admin: &AdminUser,
        query: &UserListQuery,
    ) -> Result<PageResponse<UserOverview>, AppError> {
        let page = self.overview.list(query).await.map_err(|e| {
            error!(
                admin_id = %admin.id,
                error = %e,
                details = e.details_or_message(),
                "Failed to load users"
            );
            AppError::database("Failed to load users.").with_details(e.details_or_message().to_string())
        })?;

        let response =
            PageResponse::new(page.rows, &query.page, page.total).map(UserOverview::from);

        info!(
            admin_id = %admin.id,
            role = %admin.role,
            sort = %query.sort,
            page = response.page,
            page_size = response.page_size,
            returned = response.data.len(),
            total = response.total,
            "Admin listed users"
        );

        Ok(response)
    }
}
