//! Auth session issued by the identity provider.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A session as issued by the identity provider and stored in the
/// caller's auth cookie.
///
/// Unknown fields (the embedded user object, provider tokens, ...) are
/// preserved so a refreshed session round-trips through the cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    /// Bearer token for the identity provider.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: String,
    /// Access token expiry as Unix seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
    /// Access token lifetime in seconds, as issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
    /// Token type, normally `bearer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Remaining attributes, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AuthSession {
    /// Whether the access token expires within `margin_secs` of `now_secs`.
    ///
    /// A session without a known expiry is treated as still valid; the
    /// identity provider remains the authority on token validity.
    pub fn expires_within(&self, now_secs: i64, margin_secs: i64) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now_secs.saturating_add(margin_secs),
            None => false,
        }
    }

    /// Fill `expires_at` from `expires_in` when only the lifetime is known.
    pub fn with_expiry_from(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = self.expires_in.map(|ttl| now_secs.saturating_add(ttl));
        }
        self
    }
}
