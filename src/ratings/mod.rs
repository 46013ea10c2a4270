pub mod aggregate;

use axum::{
    Json, Router, debug_handler,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppError, AppResult, AppState,
    auth::AuthUser,
    db::{self, Rating, SwapStatus},
    swaps::lifecycle,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_rating))
        .route("/user/{user_id}", get(user_ratings))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateBody {
    swap_request_id: String,
    rated_user_id: String,
    rating: i64,
    comment: Option<String>,
}

/// A rating may only be left once per participant per completed swap. The
/// UNIQUE (swap_request_id, rater_id) index backs the pre-check, so two
/// concurrent attempts cannot both land.
#[debug_handler(state = AppState)]
pub(crate) async fn create_rating(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Json(body): Json<CreateBody>,
) -> AppResult<Json<Rating>> {
    if !(1..=5).contains(&body.rating) {
        return Err(AppError::InvalidOperation(
            "Rating must be between 1 and 5".to_owned(),
        ));
    }

    let Some(swap) = lifecycle::fetch(&db_pool, &body.swap_request_id).await? else {
        return Err(AppError::NotFound("Swap request not found".to_owned()));
    };
    if swap.status != SwapStatus::Completed {
        return Err(AppError::InvalidOperation(
            "Can only rate completed swaps".to_owned(),
        ));
    }
    if current.id != swap.requester_id && current.id != swap.target_user_id {
        return Err(AppError::PermissionDenied(
            "Can only rate swaps you were part of".to_owned(),
        ));
    }

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM ratings WHERE swap_request_id = ? AND rater_id = ?")
            .bind(&body.swap_request_id)
            .bind(&current.id)
            .fetch_optional(&db_pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Rating already exists for this swap".to_owned(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let inserted = sqlx::query(
        "INSERT INTO ratings
            (id, swap_request_id, rater_id, rated_user_id, rating, comment, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&body.swap_request_id)
    .bind(&current.id)
    .bind(&body.rated_user_id)
    .bind(body.rating)
    .bind(&body.comment)
    .bind(Utc::now())
    .execute(&db_pool)
    .await;

    match inserted {
        Ok(_) => {}
        Err(err) if db::is_unique_violation(&err) => {
            return Err(AppError::Conflict(
                "Rating already exists for this swap".to_owned(),
            ));
        }
        Err(err) => return Err(err.into()),
    }

    aggregate::recompute_average(&db_pool, &body.rated_user_id).await?;

    let rating: Rating = sqlx::query_as("SELECT * FROM ratings WHERE id = ?")
        .bind(&id)
        .fetch_one(&db_pool)
        .await?;
    Ok(Json(rating))
}

#[debug_handler(state = AppState)]
pub(crate) async fn user_ratings(
    State(db_pool): State<SqlitePool>,
    AuthUser(_): AuthUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Rating>>> {
    let ratings = sqlx::query_as("SELECT * FROM ratings WHERE rated_user_id = ?")
        .bind(&user_id)
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(ratings))
}
