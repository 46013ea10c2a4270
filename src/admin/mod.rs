use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState,
    auth::AdminUser,
    db::{SwapRequest, User},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(all_users))
        .route("/users/{user_id}/ban", put(ban_user))
        .route("/users/{user_id}/unban", put(unban_user))
        .route("/swap-requests", get(all_swap_requests))
        .route("/stats", get(stats))
}

#[debug_handler(state = AppState)]
pub(crate) async fn all_users(
    State(db_pool): State<SqlitePool>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<Vec<User>>> {
    let users = sqlx::query_as("SELECT * FROM users")
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(users))
}

#[debug_handler(state = AppState)]
pub(crate) async fn ban_user(
    State(db_pool): State<SqlitePool>,
    AdminUser(_): AdminUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    sqlx::query("UPDATE users SET is_banned = 1 WHERE id = ?")
        .bind(&user_id)
        .execute(&db_pool)
        .await?;
    tracing::info!(user_id = %user_id, "banned user");
    Ok(Json(serde_json::json!({ "message": "User banned successfully" })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn unban_user(
    State(db_pool): State<SqlitePool>,
    AdminUser(_): AdminUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    sqlx::query("UPDATE users SET is_banned = 0 WHERE id = ?")
        .bind(&user_id)
        .execute(&db_pool)
        .await?;
    tracing::info!(user_id = %user_id, "unbanned user");
    Ok(Json(serde_json::json!({ "message": "User unbanned successfully" })))
}

#[debug_handler(state = AppState)]
pub(crate) async fn all_swap_requests(
    State(db_pool): State<SqlitePool>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<Vec<SwapRequest>>> {
    let swaps = sqlx::query_as("SELECT * FROM swap_requests")
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(swaps))
}

#[derive(Debug, Serialize)]
pub(crate) struct Stats {
    total_users: i64,
    total_swaps: i64,
    pending_swaps: i64,
    completed_swaps: i64,
}

#[debug_handler(state = AppState)]
pub(crate) async fn stats(
    State(db_pool): State<SqlitePool>,
    AdminUser(_): AdminUser,
) -> AppResult<Json<Stats>> {
    let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&db_pool)
        .await?;
    let total_swaps: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM swap_requests")
        .fetch_one(&db_pool)
        .await?;
    let pending_swaps: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM swap_requests WHERE status = 'pending'")
            .fetch_one(&db_pool)
            .await?;
    let completed_swaps: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM swap_requests WHERE status = 'completed'")
            .fetch_one(&db_pool)
            .await?;

    Ok(Json(Stats {
        total_users,
        total_swaps,
        pending_swaps,
        completed_swaps,
    }))
}
