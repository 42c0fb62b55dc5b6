//! End-to-end behavior of `GET /api/admin/users` over in-memory stores.

use axum::http::{StatusCode, header};
use chrono::{Duration, Utc};
use serde_json::json;

use crate::helpers::*;

fn rows() -> Vec<joeview_entity::overview::UserOverviewRow> {
    let now = Utc::now();
    vec![
        overview_row(
            "ann@example.com",
            Some("Ann Lee"),
            Some("plan_pro"),
            Some("active"),
            json!(120.5),
            Some(now - Duration::hours(1)),
        ),
        overview_row(
            "bob@example.com",
            Some("Joanna B"),
            Some("plan_pro"),
            Some("past_due"),
            json!("15"),
            Some(now - Duration::days(3)),
        ),
        overview_row(
            "carl@example.com",
            None,
            Some("plan_free"),
            Some("active"),
            json!(null),
            None,
        ),
        overview_row(
            "DEREK@EXAMPLE.COM",
            Some("Derek"),
            Some("plan_pro"),
            Some("active"),
            json!(3),
            Some(now - Duration::days(2)),
        ),
    ]
}

fn app_for(role: &str, overview: FakeOverview) -> (TestApp, Admin) {
    let admin = Admin::new("owner-token");
    let (identity, roles) = signed_in(&admin, role);
    (TestApp::new(identity, roles, overview), admin)
}

fn overview_with(rows: Vec<joeview_entity::overview::UserOverviewRow>) -> FakeOverview {
    FakeOverview {
        rows,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_anonymous_request_is_forbidden() {
    let (app, _) = app_for("owner", overview_with(rows()));

    let res = app.get("/api/admin/users", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body, json!({ "error": "Not authorised to access admin API." }));
    assert_eq!(*app.roles.lookups.lock().unwrap(), 0);
    assert!(app.overview.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_token_is_forbidden_not_server_error() {
    let (app, _) = app_for("owner", overview_with(rows()));
    let cookie = session_cookie(&live_session("forged"));

    let res = app.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unreachable_identity_provider_is_forbidden() {
    let admin = Admin::new("owner-token");
    let (mut identity, roles) = signed_in(&admin, "owner");
    identity.unreachable = true;
    let app = TestApp::new(identity, roles, overview_with(rows()));

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_undecodable_cookie_is_forbidden() {
    let (app, _) = app_for("owner", overview_with(rows()));
    let cookie = format!("{COOKIE_NAME}=base64-@@@");

    let res = app.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signed_in_user_without_role_is_forbidden() {
    let admin = Admin::new("member-token");
    let (identity, _) = signed_in(&admin, "owner");
    let app = TestApp::new(identity, FakeRoles::default(), overview_with(rows()));

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "Not authorised to access admin API.");
}

#[tokio::test]
async fn test_recognised_roles_are_admitted() {
    for role in ["owner", "support", "read_only"] {
        let (app, admin) = app_for(role, overview_with(rows()));
        let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
        assert_eq!(res.status, StatusCode::OK, "role {role}");
    }
}

#[tokio::test]
async fn test_unrecognised_roles_are_forbidden() {
    for role in ["admin", "OWNER", "superuser"] {
        let (app, admin) = app_for(role, overview_with(rows()));
        let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
        assert_eq!(res.status, StatusCode::FORBIDDEN, "role {role}");
    }
}

#[tokio::test]
async fn test_role_lookup_failure_is_unexpected_error() {
    let admin = Admin::new("owner-token");
    let (identity, mut roles) = signed_in(&admin, "owner");
    roles.fail = true;
    let app = TestApp::new(identity, roles, overview_with(rows()));

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.body,
        json!({
            "error": "Unexpected error in admin users endpoint.",
            "details": "Failed to check admin role."
        })
    );
}

#[tokio::test]
async fn test_default_listing_envelope() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["page"], 1);
    assert_eq!(res.body["pageSize"], 20);
    assert_eq!(res.body["total"], 4);
    assert_eq!(res.body["hasMore"], false);

    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 4);
    // Most recently active first.
    assert_eq!(data[0]["email"], "ann@example.com");

    let keys: Vec<&str> = data[0].as_object().unwrap().keys().map(String::as_str).collect();
    for key in [
        "userId",
        "email",
        "displayName",
        "planId",
        "planName",
        "subscriptionStatus",
        "creditBalance",
        "projectCount",
        "jobCount",
        "generationCount",
        "lastActiveAt",
    ] {
        assert!(keys.contains(&key), "missing {key}");
    }
}

#[tokio::test]
async fn test_null_fields_are_preserved_and_numbers_default_to_zero() {
    let (app, admin) = app_for("support", overview_with(rows()));

    let res = app
        .get("/api/admin/users?q=carl", Some(&admin.cookie()))
        .await;
    let carl = &res.body["data"][0];
    assert_eq!(carl["creditBalance"], 0.0);
    assert_eq!(carl["generationCount"], 0);
    assert_eq!(carl["jobCount"], 2);
    assert!(carl["displayName"].is_null());
    assert!(carl["lastActiveAt"].is_null());
}

#[tokio::test]
async fn test_search_matches_email_or_display_name_case_insensitively() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get("/api/admin/users?q=%20ANN%20", Some(&admin.cookie()))
        .await;
    let emails: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();

    // "Ann Lee" by email and name, "Joanna B" by display name.
    assert_eq!(emails.len(), 2);
    assert!(emails.contains(&"ann@example.com"));
    assert!(emails.contains(&"bob@example.com"));

    let query = app.overview.queries.lock().unwrap()[0].clone();
    assert_eq!(query.search.as_deref(), Some("ANN"));
}

#[tokio::test]
async fn test_plan_and_status_filters_combine() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get(
            "/api/admin/users?planId=plan_pro&status=active",
            Some(&admin.cookie()),
        )
        .await;
    let data = res.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert!(
        data.iter()
            .all(|u| u["planId"] == "plan_pro" && u["subscriptionStatus"] == "active")
    );
}

#[tokio::test]
async fn test_blank_filters_are_ignored() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get("/api/admin/users?q=%20%20&planId=&status=", Some(&admin.cookie()))
        .await;
    assert_eq!(res.body["total"], 4);
}

#[tokio::test]
async fn test_credits_ascending_is_non_decreasing() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get("/api/admin/users?sort=credits_asc", Some(&admin.cookie()))
        .await;
    let credits: Vec<f64> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["creditBalance"].as_f64().unwrap())
        .collect();
    assert_eq!(credits, vec![0.0, 3.0, 15.0, 120.5]);
}

#[tokio::test]
async fn test_unknown_sort_uses_default() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get("/api/admin/users?sort=email_asc", Some(&admin.cookie()))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let query = app.overview.queries.lock().unwrap()[0].clone();
    assert_eq!(query.sort, joeview_entity::overview::UserSort::LastActiveAtDesc);
}

#[tokio::test]
async fn test_second_page_of_forty_five() {
    let many = (0..45)
        .map(|i| {
            overview_row(
                &format!("user{i}@example.com"),
                None,
                None,
                None,
                json!(i),
                None,
            )
        })
        .collect();
    let (app, admin) = app_for("read_only", overview_with(many));

    let res = app
        .get("/api/admin/users?page=2&pageSize=20", Some(&admin.cookie()))
        .await;
    assert_eq!(res.body["page"], 2);
    assert_eq!(res.body["pageSize"], 20);
    assert_eq!(res.body["total"], 45);
    assert_eq!(res.body["hasMore"], true);
    assert_eq!(res.body["data"].as_array().unwrap().len(), 20);

    let query = app.overview.queries.lock().unwrap()[0].clone();
    assert_eq!(query.page.offset(), 20);
    assert_eq!(query.page.last_index(), 39);

    let last = app
        .get("/api/admin/users?page=3&pageSize=20", Some(&admin.cookie()))
        .await;
    assert_eq!(last.body["data"].as_array().unwrap().len(), 5);
    assert_eq!(last.body["hasMore"], false);
}

#[tokio::test]
async fn test_page_size_is_clamped_and_invalid_values_reset() {
    let (app, admin) = app_for("owner", overview_with(rows()));

    let res = app
        .get("/api/admin/users?pageSize=500", Some(&admin.cookie()))
        .await;
    assert_eq!(res.body["pageSize"], 100);

    for bad in ["0", "-1", "abc", ""] {
        let res = app
            .get(
                &format!("/api/admin/users?page={bad}&pageSize={bad}"),
                Some(&admin.cookie()),
            )
            .await;
        assert_eq!(res.body["page"], 1, "input {bad:?}");
        assert_eq!(res.body["pageSize"], 20, "input {bad:?}");
    }
}

#[tokio::test]
async fn test_missing_count_falls_back_to_returned_rows() {
    let overview = FakeOverview {
        rows: rows(),
        mode: OverviewMode::NoCount,
        ..Default::default()
    };
    let (app, admin) = app_for("owner", overview);

    let res = app
        .get("/api/admin/users?pageSize=2", Some(&admin.cookie()))
        .await;
    assert_eq!(res.body["total"], 2);
    assert_eq!(res.body["hasMore"], false);
}

#[tokio::test]
async fn test_list_failure_returns_details_and_no_rows() {
    let overview = FakeOverview {
        rows: rows(),
        mode: OverviewMode::Fail,
        ..Default::default()
    };
    let (app, admin) = app_for("owner", overview);

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.body,
        json!({
            "error": "Failed to load users.",
            "details": "canceling statement due to statement timeout"
        })
    );
}

#[tokio::test]
async fn test_panic_in_handler_is_caught() {
    let overview = FakeOverview {
        mode: OverviewMode::Panic,
        ..Default::default()
    };
    let (app, admin) = app_for("owner", overview);

    let res = app.get("/api/admin/users", Some(&admin.cookie())).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body["error"], "Unexpected error in admin users endpoint.");
    assert_eq!(res.body["details"], "overview store exploded");
}

#[tokio::test]
async fn test_expiring_session_is_refreshed_and_cookie_rewritten() {
    let admin = Admin::new("stale-token");
    let (mut identity, roles) = signed_in(&admin, "owner");
    let fresh = live_session("fresh-token");
    identity
        .users
        .insert("fresh-token".to_string(), admin.identity());
    identity
        .refreshes
        .insert("stale-token-refresh".to_string(), fresh);
    let app = TestApp::new(identity, roles, overview_with(rows()));

    let stale = session("stale-token", Utc::now().timestamp() + 10);
    let res = app
        .get("/api/admin/users", Some(&session_cookie(&stale)))
        .await;
    assert_eq!(res.status, StatusCode::OK);

    let set_cookies: Vec<&str> = res
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(set_cookies.len(), 1);
    assert!(set_cookies[0].starts_with(&format!("{COOKIE_NAME}=base64-")));
    assert!(set_cookies[0].contains("Path=/"));
    assert!(set_cookies[0].contains("SameSite=Lax"));
}

#[tokio::test]
async fn test_failed_refresh_is_forbidden() {
    let admin = Admin::new("stale-token");
    let (identity, roles) = signed_in(&admin, "owner");
    let app = TestApp::new(identity, roles, overview_with(rows()));

    let expired = session("stale-token", Utc::now().timestamp() - 60);
    let encoded = joeview_auth::session::cookies::encode_value(&expired).unwrap();
    let (a, b) = encoded.split_at(encoded.len() / 2);
    let cookie = format!("{COOKIE_NAME}.0={a}; {COOKIE_NAME}.1={b}; theme=dark");

    let res = app.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    // The dead session is expired so it is not retried on the next request.
    let mut set_cookies: Vec<&str> = res
        .headers
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    set_cookies.sort();
    assert_eq!(set_cookies.len(), 2);
    assert!(set_cookies[0].starts_with(&format!("{COOKIE_NAME}.0=;")));
    assert!(set_cookies[1].starts_with(&format!("{COOKIE_NAME}.1=;")));
    assert!(set_cookies.iter().all(|c| c.contains("Max-Age=0")));
    assert!(set_cookies.iter().all(|c| c.contains("Path=/")));
}

#[tokio::test]
async fn test_unreachable_refresh_keeps_cookies() {
    let admin = Admin::new("stale-token");
    let (mut identity, roles) = signed_in(&admin, "owner");
    identity.unreachable = true;
    let app = TestApp::new(identity, roles, overview_with(rows()));

    let expired = session("stale-token", Utc::now().timestamp() - 60);
    let res = app
        .get("/api/admin/users", Some(&session_cookie(&expired)))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert!(res.headers.get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn test_chunked_cookie_is_accepted() {
    let (app, admin) = app_for("owner", overview_with(rows()));
    let encoded = joeview_auth::session::cookies::encode_value(&live_session(&admin.token)).unwrap();
    let (a, b) = encoded.split_at(encoded.len() / 2);
    let cookie = format!("{COOKIE_NAME}.0={a}; {COOKIE_NAME}.1={b}");

    let res = app.get("/api/admin/users", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app_for("owner", FakeOverview::default());

    let res = app.get("/api/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["success"], true);
    assert_eq!(res.body["data"]["status"], "ok");
}
