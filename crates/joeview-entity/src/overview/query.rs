//! The user list query, built from request parameters.

use serde::{Deserialize, Serialize};

use joeview_core::types::{Filter, FilterField, PageRequest, SortField};

use super::sort::UserSort;

/// A filtered, sorted, paginated read of the user overview.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Case-insensitive substring matched against email or display name.
    pub search: Option<String>,
    /// Exact plan identifier.
    pub plan_id: Option<String>,
    /// Exact subscription status.
    pub status: Option<String>,
    /// Sort order.
    pub sort: UserSort,
    /// Page window.
    pub page: PageRequest,
}

impl UserListQuery {
    /// Build a query from raw parameter values.
    ///
    /// Text parameters are trimmed and dropped when empty.
    pub fn from_params(
        q: Option<&str>,
        plan_id: Option<&str>,
        status: Option<&str>,
        sort: Option<&str>,
        page: Option<&str>,
        page_size: Option<&str>,
    ) -> Self {
        Self {
            search: non_empty(q),
            plan_id: non_empty(plan_id),
            status: non_empty(status),
            sort: UserSort::from_param(sort),
            page: PageRequest::from_params(page, page_size),
        }
    }

    /// Filter clauses over the overview view, combined with AND.
    ///
    /// The search term becomes a single OR clause across email and
    /// display name; plan and status are independent equality clauses.
    pub fn filters(&self) -> Vec<Filter> {
        let mut filters = Vec::new();

        if let Some(search) = &self.search {
            filters.push(Filter::AnyOf(vec![
                FilterField::contains("email", search),
                FilterField::contains("display_name", search),
            ]));
        }
        if let Some(plan_id) = &self.plan_id {
            filters.push(Filter::Field(FilterField::eq("plan_id", plan_id)));
        }
        if let Some(status) = &self.status {
            filters.push(Filter::Field(FilterField::eq("subscription_status", status)));
        }

        filters
    }

    /// Column and direction to order by.
    pub fn sort_field(&self) -> SortField {
        self.sort.sort_field()
    }
}

fn non_empty(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
