//! Identity provider capability.
//!
//! The provider is always called with the low-privilege anon key paired
//! with the caller's own token, never with elevated credentials.

pub mod gotrue;

use async_trait::async_trait;

use joeview_core::result::AppResult;
use joeview_entity::session::{AuthSession, CallerIdentity};

pub use gotrue::GoTrueIdentityProvider;

/// Session-bound access to the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + 'static {
    /// Resolve the user who owns `access_token`.
    async fn get_user(&self, access_token: &str) -> AppResult<CallerIdentity>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> AppResult<AuthSession>;
}
