//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use joeview_auth::rbac::AdminAuthorizer;
use joeview_auth::session::SessionResolver;
use joeview_core::config::AppConfig;
use joeview_service::user::AdminUserService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Nothing in it is
/// mutated after startup, so clones are cheap and lock-free.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Caller resolution from session cookies
    pub session_resolver: Arc<SessionResolver>,
    /// Admin role check
    pub admin_authorizer: Arc<AdminAuthorizer>,
    /// User overview listing
    pub admin_user_service: Arc<AdminUserService>,
}
