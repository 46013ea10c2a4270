use axum::{
    Json, debug_handler,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    AppError, AppResult, AppState,
    auth::AuthUser,
    db::{Rating, SwapRequest, User},
};

#[derive(Debug, Serialize)]
pub(crate) struct UserProfile {
    user: User,
    ratings: Vec<Rating>,
    recent_swaps: Vec<SwapRequest>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_profile(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<UserProfile>> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_optional(&db_pool)
        .await?;
    let Some(user) = user else {
        return Err(AppError::NotFound("User not found".to_owned()));
    };

    if !user.is_public && user.id != current.id {
        return Err(AppError::PermissionDenied("Profile is private".to_owned()));
    }

    let ratings: Vec<Rating> = sqlx::query_as("SELECT * FROM ratings WHERE rated_user_id = ?")
        .bind(&user_id)
        .fetch_all(&db_pool)
        .await?;

    let recent_swaps: Vec<SwapRequest> = sqlx::query_as(
        "SELECT * FROM swap_requests
         WHERE status = 'completed' AND (requester_id = ? OR target_user_id = ?)
         ORDER BY updated_at DESC LIMIT 5",
    )
    .bind(&user_id)
    .bind(&user_id)
    .fetch_all(&db_pool)
    .await?;

    Ok(Json(UserProfile {
        user,
        ratings,
        recent_swaps,
    }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBody {
    name: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    skills_offered: Option<Vec<String>>,
    skills_wanted: Option<Vec<String>>,
    availability: Option<String>,
    is_public: Option<bool>,
}

/// Partial update: omitted fields keep their stored value.
#[debug_handler(state = AppState)]
pub(crate) async fn update_me(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Json(body): Json<UpdateBody>,
) -> AppResult<Json<User>> {
    sqlx::query(
        "UPDATE users SET
            name = COALESCE(?, name),
            location = COALESCE(?, location),
            bio = COALESCE(?, bio),
            skills_offered = COALESCE(?, skills_offered),
            skills_wanted = COALESCE(?, skills_wanted),
            availability = COALESCE(?, availability),
            is_public = COALESCE(?, is_public)
         WHERE id = ?",
    )
    .bind(&body.name)
    .bind(&body.location)
    .bind(&body.bio)
    .bind(body.skills_offered.as_ref().map(sqlx::types::Json))
    .bind(body.skills_wanted.as_ref().map(sqlx::types::Json))
    .bind(&body.availability)
    .bind(body.is_public)
    .bind(&current.id)
    .execute(&db_pool)
    .await?;

    let updated: User = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(&current.id)
        .fetch_one(&db_pool)
        .await?;
    Ok(Json(updated))
}
