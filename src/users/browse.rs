use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use sqlx::SqlitePool;

use crate::{AppResult, AppState, auth::AuthUser, db::User};

#[debug_handler(state = AppState)]
pub(crate) async fn list_users(
    State(db_pool): State<SqlitePool>,
    AuthUser(_): AuthUser,
) -> AppResult<Json<Vec<User>>> {
    let users = sqlx::query_as("SELECT * FROM users WHERE is_public = 1 AND is_banned = 0")
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(users))
}

/// Case-insensitive substring match against the offered-skills list.
#[debug_handler(state = AppState)]
pub(crate) async fn search_by_skill(
    State(db_pool): State<SqlitePool>,
    AuthUser(_): AuthUser,
    Path(skill): Path<String>,
) -> AppResult<Json<Vec<User>>> {
    let users = sqlx::query_as(
        "SELECT * FROM users
         WHERE is_public = 1 AND is_banned = 0 AND skills_offered LIKE ?",
    )
    .bind(format!("%{skill}%"))
    .fetch_all(&db_pool)
    .await?;
    Ok(Json(users))
}
