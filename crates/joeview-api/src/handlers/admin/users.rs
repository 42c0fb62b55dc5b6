//! Admin user listing handler.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;

use joeview_auth::rbac::AdminDecision;
use joeview_auth::session::{Caller, CookieUpdates};
use joeview_core::error::{AppError, ErrorKind};
use joeview_core::result::AppResult;
use joeview_core::types::pagination::PageResponse;
use joeview_entity::overview::UserOverview;

use crate::extractors::ListUsersParams;
use crate::state::AppState;

/// Body of every denied request.
pub const NOT_AUTHORISED: &str = "Not authorised to access admin API.";
/// Summary used for failures other than a denial or a failed list query.
pub const UNEXPECTED_ERROR: &str = "Unexpected error in admin users endpoint.";

/// Page type returned on success.
pub type UserPage = PageResponse<UserOverview>;

/// GET /api/admin/users
///
/// Resolves the caller from the session cookie, checks their admin role and
/// returns one page of the user overview. Cookies rewritten by a session
/// refresh are sent back whatever the outcome.
pub async fn list_users(
    State(state): State<AppState>,
    jar: CookieJar,
    params: ListUsersParams,
) -> Response {
    let cookies: Vec<Cookie<'static>> = jar.iter().cloned().collect();
    let resolved = state.session_resolver.resolve(&cookies).await;
    let jar = apply_cookie_updates(jar, resolved.cookies);

    let result = list_for_caller(&state, &resolved.caller, &params)
        .await
        .map(Json)
        .map_err(into_endpoint_error);

    (jar, result).into_response()
}

async fn list_for_caller(
    state: &AppState,
    caller: &Caller,
    params: &ListUsersParams,
) -> AppResult<UserPage> {
    let admin = match state.admin_authorizer.authorize(caller).await? {
        AdminDecision::Admitted(admin) => admin,
        AdminDecision::Denied(reason) => {
            tracing::info!(reason = %reason, "Rejected admin users request");
            return Err(AppError::authorization(NOT_AUTHORISED));
        }
    };

    state
        .admin_user_service
        .list_users(&admin, &params.to_query())
        .await
}

/// Keep denials and list failures as they are; everything else is reported
/// under the endpoint's generic message.
fn into_endpoint_error(err: AppError) -> AppError {
    match err.kind {
        ErrorKind::Authorization | ErrorKind::Database => err,
        _ => AppError::internal(UNEXPECTED_ERROR).with_details(err.message),
    }
}

fn apply_cookie_updates(jar: CookieJar, updates: CookieUpdates) -> CookieJar {
    let jar = updates.remove.into_iter().fold(jar, |jar, c| jar.remove(c));
    updates.set.into_iter().fold(jar, |jar, c| jar.add(c))
}
