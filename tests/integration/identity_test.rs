//! The GoTrue identity provider and full production wiring against stub
//! upstream servers.

use std::collections::HashMap;

use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use chrono::Utc;
use serde_json::{Value, json};
use tower::ServiceExt;

use joeview_api::{build_app, build_state};
use joeview_auth::identity::{GoTrueIdentityProvider, IdentityProvider};
use joeview_core::config::AppConfig;
use joeview_core::config::supabase::SupabaseConfig;
use joeview_core::error::ErrorKind;

use crate::helpers::{Captured, live_session, session, spawn_stub};

const USER_ID: &str = "6f1c3c52-2f0e-4c5e-9d8c-3c6f2a1b0e11";

async fn user(State(captured): State<Captured>, uri: Uri, headers: HeaderMap) -> Response {
    captured.record(&uri, &headers);
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let apikey = headers.get("apikey").and_then(|v| v.to_str().ok());

    if apikey != Some("anon-key") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "No API key found" })))
            .into_response();
    }

    match bearer {
        Some("Bearer good-token") | Some("Bearer refreshed-token") => Json(json!({
            "id": USER_ID,
            "aud": "authenticated",
            "role": "authenticated",
            "email": "owner@example.com",
            "app_metadata": { "provider": "email" }
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "msg": "invalid JWT: token is expired" })),
        )
            .into_response(),
    }
}

async fn token(
    State(captured): State<Captured>,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    captured.record(&uri, &headers);
    let valid = params.get("grant_type").map(String::as_str) == Some("refresh_token")
        && body["refresh_token"] == "good-refresh";

    if valid {
        Json(json!({
            "access_token": "refreshed-token",
            "refresh_token": "next-refresh",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": USER_ID }
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid Refresh Token: Refresh Token Not Found"
            })),
        )
            .into_response()
    }
}

async fn roles(State(captured): State<Captured>, uri: Uri, headers: HeaderMap) -> Response {
    captured.record(&uri, &headers);
    Json(json!([{ "role": "owner" }])).into_response()
}

async fn overview(State(captured): State<Captured>, uri: Uri, headers: HeaderMap) -> Response {
    captured.record(&uri, &headers);
    (
        [(header::CONTENT_RANGE, "0-0/1")],
        Json(json!([{
            "user_id": USER_ID,
            "email": "owner@example.com",
            "display_name": "Owner",
            "plan_id": null,
            "plan_name": null,
            "subscription_status": null,
            "credit_balance": 5,
            "project_count": 0,
            "job_count": 0,
            "generation_count": 0,
            "last_active_at": "2024-05-01 10:20:30+00"
        }])),
    )
        .into_response()
}

async fn overview_odd_timestamps(
    State(captured): State<Captured>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    captured.record(&uri, &headers);
    let row = |id: &str, last_active: Value| {
        json!({
            "user_id": id,
            "email": "owner@example.com",
            "credit_balance": 1,
            "last_active_at": last_active
        })
    };
    (
        [(header::CONTENT_RANGE, "0-2/3")],
        Json(json!([
            row(USER_ID, json!("infinity")),
            row("1b6cf3a2-8a4e-4f55-9a63-5a2d2f6c9e02", json!("2024-05-01")),
            row("2b6cf3a2-8a4e-4f55-9a63-5a2d2f6c9e03", json!("2024-05-01T10:20:30Z")),
        ])),
    )
        .into_response()
}

async fn upstream(captured: &Captured) -> String {
    upstream_with(captured, get(overview)).await
}

async fn upstream_with(captured: &Captured, overview: MethodRouter<Captured>) -> String {
    spawn_stub(
        Router::new()
            .route("/auth/v1/user", get(user))
            .route("/auth/v1/token", post(token))
            .route("/rest/v1/admin_roles", get(roles))
            .route("/rest/v1/vw_user_overview", overview)
            .with_state(captured.clone()),
    )
    .await
}

fn provider(base: &str) -> GoTrueIdentityProvider {
    GoTrueIdentityProvider::new(reqwest::Client::new(), format!("{base}/auth/v1"), "anon-key")
}

#[tokio::test]
async fn test_get_user_with_valid_token() {
    let captured = Captured::default();
    let base = upstream(&captured).await;

    let identity = provider(&base).get_user("good-token").await.unwrap();
    assert_eq!(identity.id.to_string(), USER_ID);
    assert_eq!(identity.email.as_deref(), Some("owner@example.com"));

    let req = &captured.all()[0];
    assert_eq!(req.header("apikey"), Some("anon-key"));
    assert_eq!(req.header("authorization"), Some("Bearer good-token"));
}

#[tokio::test]
async fn test_get_user_with_rejected_token() {
    let captured = Captured::default();
    let base = upstream(&captured).await;

    let err = provider(&base).get_user("expired").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(err.details.as_deref(), Some("invalid JWT: token is expired"));
}

#[tokio::test]
async fn test_unreachable_provider_is_external_error() {
    let err = provider("http://127.0.0.1:9")
        .get_user("good-token")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::ExternalService);
}

#[tokio::test]
async fn test_refresh_session() {
    let captured = Captured::default();
    let base = upstream(&captured).await;
    let before = Utc::now().timestamp();

    let refreshed = provider(&base).refresh_session("good-refresh").await.unwrap();
    assert_eq!(refreshed.access_token, "refreshed-token");
    assert_eq!(refreshed.refresh_token, "next-refresh");
    let expires_at = refreshed.expires_at.unwrap();
    assert!(expires_at >= before + 3600);
    assert!(refreshed.extra.contains_key("user"));

    let req = &captured.all()[0];
    assert_eq!(req.path, "/auth/v1/token");
    assert_eq!(req.param("grant_type"), Some("refresh_token"));

    let err = provider(&base).refresh_session("bogus").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Authentication);
    assert_eq!(
        err.details.as_deref(),
        Some("Invalid Refresh Token: Refresh Token Not Found")
    );
}

fn config(base: &str) -> AppConfig {
    AppConfig {
        server: Default::default(),
        supabase: SupabaseConfig {
            url: base.to_string(),
            anon_key: "anon-key".to_string(),
            service_role_key: "service-role-key".to_string(),
            ..Default::default()
        },
        logging: Default::default(),
    }
}

async fn call(app: Router, cookie: &str) -> (StatusCode, HeaderMap, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/admin/users?q=owner&sort=credits_asc")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_production_wiring_end_to_end() {
    let captured = Captured::default();
    let base = upstream(&captured).await;
    let config = config(&base);
    let cookie_name = config.supabase.auth_cookie_name();
    let cors = config.server.cors.clone();
    let app = build_app(build_state(config, reqwest::Client::new()), &cors);

    let cookie = format!(
        "{cookie_name}={}",
        joeview_auth::session::cookies::encode_value(&live_session("good-token")).unwrap()
    );
    let (status, _, body) = call(app, &cookie).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["creditBalance"], 5.0);
    assert_eq!(body["data"][0]["lastActiveAt"], "2024-05-01T10:20:30Z");

    let requests = captured.all();
    let paths: Vec<&str> = requests.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["/auth/v1/user", "/rest/v1/admin_roles", "/rest/v1/vw_user_overview"]
    );
    // The caller's token never reaches the data store.
    for req in &requests[1..] {
        assert_eq!(req.header("authorization"), Some("Bearer service-role-key"));
    }
    assert_eq!(requests[0].header("apikey"), Some("anon-key"));
}

#[tokio::test]
async fn test_production_wiring_refreshes_expiring_session() {
    let captured = Captured::default();
    let base = upstream(&captured).await;
    let config = config(&base);
    let cookie_name = config.supabase.auth_cookie_name();
    let cors = config.server.cors.clone();
    let app = build_app(build_state(config, reqwest::Client::new()), &cors);

    let mut stale = session("expired-token", Utc::now().timestamp() - 5);
    stale.refresh_token = "good-refresh".to_string();
    let cookie = format!(
        "{cookie_name}={}",
        joeview_auth::session::cookies::encode_value(&stale).unwrap()
    );
    let (status, headers, _) = call(app, &cookie).await;

    assert_eq!(status, StatusCode::OK);
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{cookie_name}=base64-")));

    let paths: Vec<String> = captured.all().into_iter().map(|r| r.path).collect();
    assert_eq!(paths[0], "/auth/v1/token");
    assert_eq!(paths[1], "/auth/v1/user");
}

#[tokio::test]
async fn test_production_wiring_clears_refused_session() {
    let captured = Captured::default();
    let base = upstream(&captured).await;
    let config = config(&base);
    let cookie_name = config.supabase.auth_cookie_name();
    let cors = config.server.cors.clone();
    let app = build_app(build_state(config, reqwest::Client::new()), &cors);

    let mut stale = session("expired-token", Utc::now().timestamp() - 5);
    stale.refresh_token = "revoked-refresh".to_string();
    let cookie = format!(
        "{cookie_name}={}",
        joeview_auth::session::cookies::encode_value(&stale).unwrap()
    );
    let (status, headers, body) = call(app, &cookie).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorised to access admin API.");
    let set_cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(set_cookie.starts_with(&format!("{cookie_name}=;")));
    assert!(set_cookie.contains("Max-Age=0"));

    let paths: Vec<String> = captured.all().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/auth/v1/token"]);
}

#[tokio::test]
async fn test_production_wiring_tolerates_unparsable_timestamps() {
    let captured = Captured::default();
    let base = upstream_with(&captured, get(overview_odd_timestamps)).await;
    let config = config(&base);
    let cookie_name = config.supabase.auth_cookie_name();
    let cors = config.server.cors.clone();
    let app = build_app(build_state(config, reqwest::Client::new()), &cors);

    let cookie = format!(
        "{cookie_name}={}",
        joeview_auth::session::cookies::encode_value(&live_session("good-token")).unwrap()
    );
    let (status, _, body) = call(app, &cookie).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"][0]["lastActiveAt"], Value::Null);
    assert_eq!(body["data"][1]["lastActiveAt"], Value::Null);
    assert_eq!(body["data"][2]["lastActiveAt"], "2024-05-01T10:20:30Z");
}
