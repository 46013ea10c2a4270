pub mod lifecycle;

use axum::{
    Json, debug_handler,
    extract::{Path, State},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppResult, AppState,
    auth::AuthUser,
    db::{SwapRequest, SwapStatus},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_request))
        .route("/my-requests", get(my_requests))
        .route("/incoming", get(incoming_requests))
        .route("/{request_id}", put(update_request).delete(delete_request))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateBody {
    target_user_id: String,
    requested_skill: String,
    offered_skill: String,
    message: Option<String>,
}

#[debug_handler(state = AppState)]
pub(crate) async fn create_request(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Json(body): Json<CreateBody>,
) -> AppResult<Json<SwapRequest>> {
    let request = lifecycle::create(
        &db_pool,
        &current.id,
        lifecycle::NewSwapRequest {
            target_user_id: body.target_user_id,
            requested_skill: body.requested_skill,
            offered_skill: body.offered_skill,
            message: body.message,
        },
    )
    .await?;
    Ok(Json(request))
}

#[debug_handler(state = AppState)]
pub(crate) async fn my_requests(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
) -> AppResult<Json<Vec<SwapRequest>>> {
    let requests = sqlx::query_as("SELECT * FROM swap_requests WHERE requester_id = ?")
        .bind(&current.id)
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(requests))
}

#[debug_handler(state = AppState)]
pub(crate) async fn incoming_requests(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
) -> AppResult<Json<Vec<SwapRequest>>> {
    let requests = sqlx::query_as("SELECT * FROM swap_requests WHERE target_user_id = ?")
        .bind(&current.id)
        .fetch_all(&db_pool)
        .await?;
    Ok(Json(requests))
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatusBody {
    status: SwapStatus,
}

#[debug_handler(state = AppState)]
pub(crate) async fn update_request(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Path(request_id): Path<String>,
    Json(body): Json<StatusBody>,
) -> AppResult<Json<SwapRequest>> {
    let request = lifecycle::transition(&db_pool, &request_id, &current.id, body.status).await?;
    Ok(Json(request))
}

#[debug_handler(state = AppState)]
pub(crate) async fn delete_request(
    State(db_pool): State<SqlitePool>,
    AuthUser(current): AuthUser,
    Path(request_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    lifecycle::delete(&db_pool, &request_id, &current.id).await?;
    Ok(Json(serde_json::json!({
        "message": "Swap request deleted successfully"
    })))
}
