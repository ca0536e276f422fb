//! Login, recovery, callback and logout against a fake auth provider, plus
//! token enforcement on protected routes.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{
    body_json, build_test_app, get, get_authed, get_with_cookie, location, mint_token, post_json, send,
    set_cookies, test_user_id, GOOD_CODE, GOOD_PASSWORD,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_rejects_malformed_input_with_field_errors() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "bad", "password": "123" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["fields"]["email"].is_array());
    assert!(json["fields"]["password"].is_array());
    assert!(json.get("session").is_none());
}

#[tokio::test]
async fn login_with_wrong_password_is_401_with_provider_message() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "site@example.com", "password": "wrong-password" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Invalid login credentials");
}

#[tokio::test]
async fn login_success_returns_session_and_cookies() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({ "email": "  site@example.com ", "password": GOOD_PASSWORD }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("verde-access-token=access-abc")));
    assert!(cookies.iter().any(|c| c.starts_with("verde-refresh-token=refresh-xyz")));

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["session"]["user"]["email"], "site@example.com");
    assert_eq!(json["session"]["user"]["id"], test_user_id().to_string());
}

#[tokio::test]
async fn login_with_redirect_is_a_303() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({
            "email": "site@example.com",
            "password": GOOD_PASSWORD,
            "redirect_to": "/projects/harbor-view"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/projects/harbor-view");
    assert!(!set_cookies(&response).is_empty());
}

#[tokio::test]
async fn login_never_redirects_off_site() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/login",
        json!({
            "email": "site@example.com",
            "password": GOOD_PASSWORD,
            "redirect_to": "https://evil.example/phish"
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
}

// ---------------------------------------------------------------------------
// Password recovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reset_password_validates_email_locally() {
    let app = build_test_app().await;
    let response = post_json(&app.router, "/api/auth/reset-password", json!({ "email": "nope" })).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["fields"]["email"].is_array());
    assert!(app.auth.last_redirect.lock().unwrap().is_none());
}

#[tokio::test]
async fn reset_password_forwards_configured_redirect() {
    let app = build_test_app().await;
    let response = post_json(
        &app.router,
        "/api/auth/reset-password",
        json!({ "email": "site@example.com" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(
        app.auth.last_redirect.lock().unwrap().as_deref(),
        Some("http://localhost:5173/reset")
    );
}

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn callback_without_code_goes_to_error_page() {
    let app = build_test_app().await;
    let response = get(&app.router, "/api/auth/callback").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/auth-code-error");
}

#[tokio::test]
async fn callback_with_bad_code_goes_to_error_page() {
    let app = build_test_app().await;
    let response = get(&app.router, "/api/auth/callback?code=stale").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/auth-code-error");
}

#[tokio::test]
async fn callback_exchanges_code_with_stored_verifier() {
    let app = build_test_app().await;
    let request = Request::builder()
        .uri(format!("/api/auth/callback?code={GOOD_CODE}&next=/dashboard"))
        .header(header::COOKIE, "verde-code-verifier=pkce-verifier-1")
        .body(Body::empty())
        .unwrap();
    let response = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");
    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("verde-access-token=")));
    assert!(cookies.iter().any(|c| c.starts_with("verde-code-verifier=;")));
    assert_eq!(
        app.auth.last_verifier.lock().unwrap().as_deref(),
        Some("pkce-verifier-1")
    );
}

// ---------------------------------------------------------------------------
// Logout and token enforcement
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_revokes_and_clears_cookies() {
    let app = build_test_app().await;
    let token = mint_token(test_user_id());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(set_cookies(&response)
        .iter()
        .any(|c| c.starts_with("verde-access-token=;") && c.contains("Max-Age=0")));
    assert_eq!(*app.auth.signed_out.lock().unwrap(), vec![token]);
}

#[tokio::test]
async fn logout_clears_cookies_when_provider_refuses() {
    let app = build_test_app().await;
    *app.auth.reject_sign_out.lock().unwrap() = true;
    let token = mint_token(test_user_id());
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/logout")
        .header(header::COOKIE, format!("verde-access-token={token}"))
        .body(Body::empty())
        .unwrap();
    let response = send(&app.router, request).await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookies = set_cookies(&response);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("verde-access-token=;") && c.contains("Max-Age=0")));
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("verde-refresh-token=;") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn session_cookie_alone_authenticates() {
    let app = build_test_app().await;
    let token = mint_token(test_user_id());
    let response = get_with_cookie(&app.router, "/api/profile", &token).await;

    // Past the extractor; the unreachable database is what fails.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn invalid_session_cookie_is_401() {
    let app = build_test_app().await;
    let response = get_with_cookie(&app.router, "/api/profile", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired token");
}

#[tokio::test]
async fn protected_route_without_token_is_401() {
    let app = build_test_app().await;
    let response = get(&app.router, "/api/projects").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn profile_with_garbage_token_is_401() {
    let app = build_test_app().await;
    let response = get_authed(&app.router, "/api/profile", "not-a-jwt").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_lookup_failure_is_500() {
    let app = build_test_app().await;
    let token = mint_token(test_user_id());
    let response = get_authed(&app.router, "/api/profile", &token).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INTERNAL_ERROR");
}
