//! Query parameter extractor for the admin user list.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use joeview_entity::overview::UserListQuery;

/// Raw list parameters as sent by the client.
///
/// Extraction never rejects: repeated keys keep their first value and an
/// unparsable query string is treated as empty, so every request falls
/// back to the defaults instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersParams {
    /// Free-text search over email and display name.
    pub q: Option<String>,
    /// Exact plan identifier.
    pub plan_id: Option<String>,
    /// Exact subscription status.
    pub status: Option<String>,
    /// Sort key.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<String>,
    /// Rows per page.
    pub page_size: Option<String>,
}

impl ListUsersParams {
    /// Collect parameters from decoded key/value pairs.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "q" => &mut params.q,
                "planId" => &mut params.plan_id,
                "status" => &mut params.status,
                "sort" => &mut params.sort,
                "page" => &mut params.page,
                "pageSize" => &mut params.page_size,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Normalize into a list query.
    pub fn to_query(&self) -> UserListQuery {
        UserListQuery::from_params(
            self.q.as_deref(),
            self.plan_id.as_deref(),
            self.status.as_deref(),
            self.sort.as_deref(),
            self.page.as_deref(),
            self.page_size.as_deref(),
        )
    }
}

impl<S> FromRequestParts<S> for ListUsersParams
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let pairs = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map(|Query(pairs)| pairs)
            .unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Ignoring unparsable query string");
                Vec::new()
            });
        Ok(Self::from_pairs(pairs))
    }
}
