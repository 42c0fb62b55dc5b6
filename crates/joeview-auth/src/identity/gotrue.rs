//! GoTrue-compatible identity provider client.

use std::fmt;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use joeview_core::config::supabase::SupabaseConfig;
use joeview_core::error::{AppError, ErrorKind};
use joeview_core::result::AppResult;
use joeview_entity::session::{AuthSession, CallerIdentity};

use super::IdentityProvider;

/// Identity provider backed by a GoTrue auth server.
#[derive(Clone)]
pub struct GoTrueIdentityProvider {
    http: reqwest::Client,
    /// Auth base URL, e.g. `https://abcd.supabase.co/auth/v1`.
    auth_url: String,
    anon_key: String,
}

impl GoTrueIdentityProvider {
    /// Create a provider for an explicit auth URL.
    pub fn new(http: reqwest::Client, auth_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            http,
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Create a provider from configuration.
    pub fn from_config(http: reqwest::Client, config: &SupabaseConfig) -> Self {
        Self::new(http, config.auth_url(), config.anon_key.clone())
    }

    async fn rejection(response: reqwest::Response) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ProviderErrorBody>(&body)
            .ok()
            .and_then(ProviderErrorBody::into_message)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

        AppError::new(rejection_kind(status), format!("Identity provider returned {}", status.as_u16()))
            .with_details(message)
    }
}

/// A 4xx answer refuses the token itself (`invalid_grant`, expired JWT),
/// so the session is dead; anything else may succeed on a later request.
fn rejection_kind(status: StatusCode) -> ErrorKind {
    if status.is_client_error() {
        ErrorKind::Authentication
    } else {
        ErrorKind::ExternalService
    }
}

#[async_trait]
impl IdentityProvider for GoTrueIdentityProvider {
    async fn get_user(&self, access_token: &str) -> AppResult<CallerIdentity> {
        let response = self
            .http
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Identity provider unreachable", e)
            })?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let user: CallerIdentity = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Invalid user payload from identity provider",
                e,
            )
        })?;

        debug!(user_id = %user.id, "Identity provider resolved user");
        Ok(user)
    }

    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession> {
        let response = self
            .http
            .post(format!("{}/token", self.auth_url))
            .query(&[("grant_type", "refresh_token")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Identity provider unreachable", e)
            })?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        let session: AuthSession = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Invalid session payload from identity provider",
                e,
            )
        })?;

        debug!("Identity provider refreshed session");
        Ok(session.with_expiry_from(Utc::now().timestamp()))
    }
}

impl fmt::Debug for GoTrueIdentityProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoTrueIdentityProvider")
            .field("auth_url", &self.auth_url)
            .finish_non_exhaustive()
    }
}

/// Error bodies vary across GoTrue versions.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    msg: Option<String>,
    message: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ProviderErrorBody {
    fn into_message(self) -> Option<String> {
        self.msg
            .or(self.message)
            .or(self.error_description)
            .or(self.error)
            .filter(|m| !m.is_empty())
    }
}
