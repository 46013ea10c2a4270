mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn register_then_me_returns_the_new_user() {
    let app = spawn_app().await;
    let token = app.register("Alice", "alice@example.com").await;

    let me = app.me(&token).await;
    assert_eq!(me["name"], "Alice");
    assert_eq!(me["email"], "alice@example.com");
    assert_eq!(me["skills_offered"], json!(["Rust"]));
    assert_eq!(me["role"], "user");
    assert_eq!(me["rating_average"], 0.0);
    assert_eq!(me["total_swaps"], 0);
    assert_eq!(me["is_banned"], false);
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = spawn_app().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Imposter",
                "email": "alice@example.com",
                "password": "hunter2!",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Email already registered");
}

#[tokio::test]
async fn login_succeeds_with_correct_credentials() {
    let app = spawn_app().await;
    app.register("Alice", "alice@example.com").await;

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "hunter2!" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "bearer");
    assert!(body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn login_rejects_bad_password_and_unknown_email() {
    let app = spawn_app().await;
    app.register("Alice", "alice@example.com").await;

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "hunter2!" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn banned_user_cannot_log_in() {
    let app = spawn_app().await;
    let token = app.register("Alice", "alice@example.com").await;
    let user_id = app.user_id(&token).await;

    sqlx::query("UPDATE users SET is_banned = 1 WHERE id = ?")
        .bind(&user_id)
        .execute(&app.db_pool)
        .await
        .unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "alice@example.com", "password": "hunter2!" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "Account has been banned");
}

#[tokio::test]
async fn requests_without_a_valid_token_get_401() {
    let app = spawn_app().await;

    let (status, _) = app.request("GET", "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/api/users", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
