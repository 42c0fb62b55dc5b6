//! REST gateway client bound to the elevated service role key.

use std::fmt;

use reqwest::header::{ACCEPT, CONTENT_RANGE};
use serde::de::DeserializeOwned;
use tracing::debug;

use joeview_core::config::supabase::SupabaseConfig;

use crate::error::GatewayError;
use crate::query::{SelectQuery, parse_content_range};

/// Rows returned by a select, plus the exact count when one was requested.
#[derive(Debug, Clone)]
pub struct SelectResponse<T> {
    /// Returned rows.
    pub rows: Vec<T>,
    /// Total matching rows, if the gateway reported it.
    pub total: Option<u64>,
}

/// Client for the REST gateway using the service role key.
///
/// The key bypasses row-level security. The client holds no session and
/// never refreshes tokens, so one instance can be cloned freely and shared
/// across requests.
#[derive(Clone)]
pub struct GatewayClient {
    /// Shared HTTP client.
    http: reqwest::Client,
    /// Gateway base URL, e.g. `https://abcd.supabase.co/rest/v1`.
    base_url: String,
    /// Service role key.
    api_key: String,
    /// Schema every request is scoped to.
    schema: String,
}

impl GatewayClient {
    /// Create a client for an explicit gateway URL and schema.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            schema: schema.into(),
        }
    }

    /// Create the elevated client from configuration.
    pub fn service_role(http: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self::new(
            http,
            config.rest_url(),
            config.service_role_key.clone(),
            config.admin_schema.clone(),
        )
    }

    /// Schema this client reads from.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Run a select and decode the rows.
    pub async fn select<T>(&self, query: &SelectQuery) -> Result<SelectResponse<T>, GatewayError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, query.relation);

        let mut request = self
            .http
            .get(&url)
            .query(&query.params())
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept-Profile", &self.schema)
            .header(ACCEPT, "application/json");

        if query.count_exact {
            request = request.header("Prefer", "count=exact");
        }

        let response = request.send().await?;
        let status = response.status();
        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range);
        let body = response.text().await?;

        if !status.is_success() {
            return Err(GatewayError::from_body(status, &body));
        }

        let rows: Vec<T> = serde_json::from_str(&body)?;

        debug!(
            relation = %query.relation,
            schema = %self.schema,
            rows = rows.len(),
            total = ?total,
            "Gateway select completed"
        );

        Ok(SelectResponse { rows, total })
    }
}

impl fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayClient")
            .field("base_url", &self.base_url)
            .field("api_key", &mask_key(&self.api_key))
            .field("schema", &self.schema)
            .finish()
    }
}

/// Mask all but the last four characters of a key for safe logging.
fn mask_key(key: &str) -> String {
    let visible: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if key.chars().count() <= 4 {
        return "****".to_string();
    }
    format!("****{visible}")
}
