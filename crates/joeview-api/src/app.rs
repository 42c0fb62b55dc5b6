//! Application builder: wires state, router and middleware into an Axum app.

use std::sync::Arc;

use axum::Router;
use axum::middleware as axum_middleware;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use joeview_auth::identity::{GoTrueIdentityProvider, IdentityProvider};
use joeview_auth::rbac::AdminAuthorizer;
use joeview_auth::session::{AuthCookieCodec, SessionResolver};
use joeview_core::config::{AppConfig, CorsConfig};
use joeview_core::error::AppError;
use joeview_database::client::GatewayClient;
use joeview_database::repositories::{AdminRoleRepository, UserOverviewRepository};
use joeview_database::store::{RoleStore, UserOverviewStore};
use joeview_service::user::AdminUserService;

use crate::middleware::compression::build_compression_layer;
use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::middleware::panic::handle_panic;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState, cors_config: &CorsConfig) -> Router {
    build_router(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(build_compression_layer())
        .layer(build_cors_layer(cors_config))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
}

/// Wires the production state from configuration.
///
/// The identity provider gets the anon key only; the role and overview
/// repositories share one gateway client holding the service role key.
pub fn build_state(config: AppConfig, http: reqwest::Client) -> AppState {
    let supabase = &config.supabase;

    let identity: Arc<dyn IdentityProvider> =
        Arc::new(GoTrueIdentityProvider::from_config(http.clone(), supabase));
    let session_resolver = Arc::new(SessionResolver::new(
        identity,
        AuthCookieCodec::new(supabase.auth_cookie_name()),
    ));

    let gateway = GatewayClient::service_role(http, supabase);
    let roles: Arc<dyn RoleStore> = Arc::new(AdminRoleRepository::new(
        gateway.clone(),
        supabase.roles_table.clone(),
    ));
    let overview: Arc<dyn UserOverviewStore> = Arc::new(UserOverviewRepository::new(
        gateway,
        supabase.overview_view.clone(),
    ));

    AppState {
        config: Arc::new(config),
        session_resolver,
        admin_authorizer: Arc::new(AdminAuthorizer::new(roles)),
        admin_user_service: Arc::new(AdminUserService::new(overview)),
    }
}

/// Runs the JoeView admin server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, http: reqwest::Client) -> Result<(), AppError> {
    let addr = config.server.bind_address();
    let cors = config.server.cors.clone();

    let app = build_app(build_state(config, http), &cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!(address = %addr, "JoeView admin API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
