//! Avatar replacement and organization membership rules against a real
//! database.
//!
//! Run with `DATABASE_URL` set and `--ignored`.

mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use common::{body_json, build_test_app_with_pool, mint_token, send_json, send_multipart};
use serde_json::{json, Value};
use sqlx::PgPool;
use uuid::Uuid;

async fn upload_avatar(app: &Router, token: &str, bytes: &[u8]) -> String {
    let response =
        send_multipart(app, "/api/profile/avatar", token, None, "me.png", "image/png", bytes).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["data"]["avatar_url"].as_str().is_some());
    json["data"]["avatar_path"].as_str().unwrap().to_string()
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn avatar_replace_then_remove_twice(pool: PgPool) {
    let app = build_test_app_with_pool(pool).await;
    let user = Uuid::new_v4();
    let token = mint_token(user);
    let avatars = app.storage_dir.path().join("avatars");

    let first = upload_avatar(&app.router, &token, b"first").await;
    assert!(first.starts_with(&user.to_string()));
    assert!(avatars.join(&first).exists());

    let second = upload_avatar(&app.router, &token, b"second").await;
    assert_ne!(first, second);
    assert!(!avatars.join(&first).exists(), "replaced avatar is cleaned up");
    assert_eq!(std::fs::read(avatars.join(&second)).unwrap(), b"second");

    let response = send_json(&app.router, Method::GET, "/api/profile", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let profile = body_json(response).await;
    assert_eq!(profile["profile"]["avatar_path"], second.as_str());

    for _ in 0..2 {
        let response =
            send_json(&app.router, Method::DELETE, "/api/profile/avatar", &token, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
    assert!(!avatars.join(&second).exists());

    let response = send_json(&app.router, Method::GET, "/api/profile", &token, None).await;
    let profile = body_json(response).await;
    assert_eq!(profile["profile"]["avatar_path"], Value::Null);
    assert_eq!(profile["profile"]["avatar_url"], Value::Null);
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn avatar_rejects_unsupported_types(pool: PgPool) {
    let app = build_test_app_with_pool(pool).await;
    let token = mint_token(Uuid::new_v4());

    let response = send_multipart(
        &app.router,
        "/api/profile/avatar",
        &token,
        None,
        "notes.txt",
        "text/plain",
        b"hello",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!app.storage_dir.path().join("avatars").exists());
}

// ---------------------------------------------------------------------------
// Membership
// ---------------------------------------------------------------------------

struct Member {
    id: Uuid,
    token: String,
}

/// A user who has signed in once, so their profile row exists.
async fn signed_in(app: &Router) -> Member {
    let id = Uuid::new_v4();
    let token = mint_token(id);
    let response = send_json(app, Method::GET, "/api/profile", &token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    Member { id, token }
}

async fn put_role(
    app: &Router,
    actor: &Member,
    org: &str,
    target: Uuid,
    role: &str,
) -> StatusCode {
    send_json(
        app,
        Method::PUT,
        &format!("/api/organizations/{org}/members/{target}"),
        &actor.token,
        Some(json!({ "role": role })),
    )
    .await
    .status()
}

async fn delete_member(app: &Router, actor: &Member, org: &str, target: Uuid) -> StatusCode {
    send_json(
        app,
        Method::DELETE,
        &format!("/api/organizations/{org}/members/{target}"),
        &actor.token,
        None,
    )
    .await
    .status()
}

async fn notification_titles(app: &Router, member: &Member) -> Vec<String> {
    let response = send_json(app, Method::GET, "/api/notifications", &member.token, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["title"].as_str().unwrap().to_string())
        .collect()
}

#[sqlx::test(migrations = "../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn membership_guards(pool: PgPool) {
    let app = build_test_app_with_pool(pool).await;
    let owner = signed_in(&app.router).await;
    let manager = signed_in(&app.router).await;
    let supplier = signed_in(&app.router).await;

    let response = send_json(
        &app.router,
        Method::POST,
        "/api/organizations",
        &owner.token,
        Some(json!({ "name": "Greenline Builders" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let org = body_json(response).await["data"]["organization_id"]
        .as_str()
        .unwrap()
        .to_string();

    for (member, role) in [(&manager, "manager"), (&supplier, "supplier")] {
        let response = send_json(
            &app.router,
            Method::POST,
            &format!("/api/organizations/{org}/members"),
            &owner.token,
            Some(json!({ "user_id": member.id, "role": role })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Adding someone who never signed in.
    let response = send_json(
        &app.router,
        Method::POST,
        &format!("/api/organizations/{org}/members"),
        &owner.token,
        Some(json!({ "user_id": Uuid::new_v4(), "role": "member" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Only an owner hands out ownership or touches an owner.
    assert_eq!(
        put_role(&app.router, &manager, &org, supplier.id, "owner").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        put_role(&app.router, &manager, &org, owner.id, "member").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        delete_member(&app.router, &manager, &org, owner.id).await,
        StatusCode::FORBIDDEN
    );
    // Suppliers cannot manage membership at all.
    assert_eq!(
        put_role(&app.router, &supplier, &org, supplier.id, "manager").await,
        StatusCode::FORBIDDEN
    );

    // The only owner can neither step down nor leave.
    assert_eq!(
        put_role(&app.router, &owner, &org, owner.id, "manager").await,
        StatusCode::CONFLICT
    );
    assert_eq!(
        delete_member(&app.router, &owner, &org, owner.id).await,
        StatusCode::FORBIDDEN
    );

    // With a second owner in place, stepping down is allowed.
    assert_eq!(
        put_role(&app.router, &owner, &org, manager.id, "owner").await,
        StatusCode::OK
    );
    assert_eq!(
        put_role(&app.router, &owner, &org, owner.id, "manager").await,
        StatusCode::OK
    );

    assert_eq!(
        delete_member(&app.router, &manager, &org, supplier.id).await,
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        delete_member(&app.router, &manager, &org, supplier.id).await,
        StatusCode::NOT_FOUND
    );

    let titles = notification_titles(&app.router, &supplier).await;
    assert_eq!(titles, vec!["Removed from organization", "Added to organization"]);
    let titles = notification_titles(&app.router, &manager).await;
    assert!(titles.contains(&"Role changed".to_string()));
}
