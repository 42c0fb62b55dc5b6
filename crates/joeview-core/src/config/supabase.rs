//! Data store and identity provider configuration.

use serde::{Deserialize, Serialize};

/// Connection settings for the managed backend.
///
/// One base URL serves both the identity provider (`/auth/v1`) and the
/// REST gateway (`/rest/v1`). The two keys are distinct capabilities: the
/// anon key is only ever paired with a caller's own session, the service
/// role key bypasses row-level access rules and is only used server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupabaseConfig {
    /// Project base URL, e.g. `https://abcd.supabase.co`.
    #[serde(default)]
    pub url: String,
    /// Low-privilege, session-bound access key.
    #[serde(default)]
    pub anon_key: String,
    /// High-privilege access key that bypasses row-level security.
    #[serde(default)]
    pub service_role_key: String,
    /// Schema holding the role table and overview view.
    #[serde(default = "default_admin_schema")]
    pub admin_schema: String,
    /// Role assignment table name.
    #[serde(default = "default_roles_table")]
    pub roles_table: String,
    /// Precomputed user overview view name.
    #[serde(default = "default_overview_view")]
    pub overview_view: String,
    /// Explicit auth cookie name; derived from the project URL when unset.
    #[serde(default)]
    pub auth_cookie_name: Option<String>,
}

impl Default for SupabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            service_role_key: String::new(),
            admin_schema: default_admin_schema(),
            roles_table: default_roles_table(),
            overview_view: default_overview_view(),
            auth_cookie_name: None,
        }
    }
}

impl SupabaseConfig {
    /// Names of required keys that are missing or blank.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.url.trim().is_empty() {
            missing.push("supabase.url");
        }
        if self.anon_key.trim().is_empty() {
            missing.push("supabase.anon_key");
        }
        if self.service_role_key.trim().is_empty() {
            missing.push("supabase.service_role_key");
        }
        missing
    }

    /// Base URL of the REST gateway.
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Base URL of the identity provider.
    pub fn auth_url(&self) -> String {
        format!("{}/auth/v1", self.url.trim_end_matches('/'))
    }

    /// Name of the cookie carrying the caller's auth session.
    ///
    /// Defaults to `sb-<project-ref>-auth-token`, where the project ref is the
    /// first DNS label of the URL host.
    pub fn auth_cookie_name(&self) -> String {
        if let Some(name) = self.auth_cookie_name.as_deref().filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        format!("sb-{}-auth-token", project_ref(&self.url))
    }
}

/// First DNS label of the host portion of a URL.
fn project_ref(url: &str) -> &str {
    let without_scheme = url.find("://").map(|p| &url[p + 3..]).unwrap_or(url);
    let authority = without_scheme.split('/').next().unwrap_or(without_scheme);
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    host.split('.').next().unwrap_or(host)
}

fn default_admin_schema() -> String {
    "admin".to_string()
}

fn default_roles_table() -> String {
    "admin_roles".to_string()
}

fn default_overview_view() -> String {
    "vw_user_overview".to_string()
}
