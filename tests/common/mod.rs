#![allow(dead_code)] // each test binary uses a different subset of these helpers

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tempfile::TempDir;
use tower::ServiceExt;

use skillswap::{AppState, app, auth::TokenKeys, db};

pub struct TestApp {
    pub router: Router,
    pub db_pool: SqlitePool,
    _dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("skillswap.db");
    let db_pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&format!("sqlite://{}?mode=rwc", db_path.display()))
        .await
        .unwrap();
    db::init(&db_pool).await.unwrap();

    let uploads_dir = dir.path().join("uploads");
    std::fs::create_dir_all(&uploads_dir).unwrap();

    let state = AppState {
        db_pool: db_pool.clone(),
        token_keys: TokenKeys::from_secret(b"test-secret"),
        uploads_dir,
    };

    TestApp {
        router: app(state),
        db_pool,
        _dir: dir,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    /// Registers a user and returns their bearer token.
    pub async fn register(&self, name: &str, email: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "hunter2!",
                    "skills_offered": ["Rust"],
                    "skills_wanted": ["Guitar"],
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {body}");
        body["access_token"].as_str().unwrap().to_owned()
    }

    pub async fn me(&self, token: &str) -> Value {
        let (status, body) = self.request("GET", "/api/auth/me", Some(token), None).await;
        assert_eq!(status, StatusCode::OK, "me failed: {body}");
        body
    }

    pub async fn user_id(&self, token: &str) -> String {
        self.me(token).await["id"].as_str().unwrap().to_owned()
    }

    pub async fn make_admin(&self, user_id: &str) {
        sqlx::query("UPDATE users SET role = 'admin' WHERE id = ?")
            .bind(user_id)
            .execute(&self.db_pool)
            .await
            .unwrap();
    }

    /// Creates a pending swap request and returns its id.
    pub async fn create_swap(&self, token: &str, target_user_id: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/swap-requests",
                Some(token),
                Some(json!({
                    "target_user_id": target_user_id,
                    "requested_skill": "Guitar",
                    "offered_skill": "Rust",
                    "message": "Trade?",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create swap failed: {body}");
        body["id"].as_str().unwrap().to_owned()
    }

    pub async fn set_status(
        &self,
        token: &str,
        request_id: &str,
        status: &str,
    ) -> (StatusCode, Value) {
        self.request(
            "PUT",
            &format!("/api/swap-requests/{request_id}"),
            Some(token),
            Some(json!({ "status": status })),
        )
        .await
    }

    /// Runs a swap from creation through completion and returns its id.
    pub async fn completed_swap(
        &self,
        requester_token: &str,
        target_token: &str,
        target_user_id: &str,
    ) -> String {
        let request_id = self.create_swap(requester_token, target_user_id).await;
        let (status, _) = self.set_status(target_token, &request_id, "accepted").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = self.set_status(target_token, &request_id, "completed").await;
        assert_eq!(status, StatusCode::OK);
        request_id
    }
}
