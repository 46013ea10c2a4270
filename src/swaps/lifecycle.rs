//! The swap-request state machine: who may move a request where, and the
//! stat increments a completion triggers. Every operation re-reads the
//! authoritative record before acting; no state is held between calls.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppError, AppResult,
    db::{SwapRequest, SwapStatus},
};

pub struct NewSwapRequest {
    pub target_user_id: String,
    pub requested_skill: String,
    pub offered_skill: String,
    pub message: Option<String>,
}

/// Authorization for a transition, evaluated on the requested target status
/// only. The current status is deliberately not consulted:
/// accepted/rejected are target-only, cancelled is requester-only, completed
/// is open to any authenticated caller.
pub fn authorize_transition(
    request: &SwapRequest,
    actor_id: &str,
    new_status: SwapStatus,
) -> Result<(), AppError> {
    match new_status {
        SwapStatus::Accepted | SwapStatus::Rejected if request.target_user_id != actor_id => {
            Err(AppError::PermissionDenied(
                "Only target user can accept/reject requests".to_owned(),
            ))
        }
        SwapStatus::Cancelled if request.requester_id != actor_id => Err(
            AppError::PermissionDenied("Only requester can cancel requests".to_owned()),
        ),
        _ => Ok(()),
    }
}

pub async fn fetch(pool: &SqlitePool, id: &str) -> Result<Option<SwapRequest>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM swap_requests WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Creates a pending request. Skills are free text; no referential check
/// against either user's lists.
pub async fn create(
    pool: &SqlitePool,
    requester_id: &str,
    new: NewSwapRequest,
) -> AppResult<SwapRequest> {
    let target: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
        .bind(&new.target_user_id)
        .fetch_optional(pool)
        .await?;
    if target.is_none() {
        return Err(AppError::NotFound("Target user not found".to_owned()));
    }
    if new.target_user_id == requester_id {
        return Err(AppError::InvalidOperation(
            "Cannot create swap request to yourself".to_owned(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let now = Utc::now();
    sqlx::query(
        "INSERT INTO swap_requests
            (id, requester_id, target_user_id, requested_skill, offered_skill,
             status, message, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, 'pending', ?, ?, ?)",
    )
    .bind(&id)
    .bind(requester_id)
    .bind(&new.target_user_id)
    .bind(&new.requested_skill)
    .bind(&new.offered_skill)
    .bind(&new.message)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    fetch(pool, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Swap request not found".to_owned()))
}

pub async fn transition(
    pool: &SqlitePool,
    request_id: &str,
    actor_id: &str,
    new_status: SwapStatus,
) -> AppResult<SwapRequest> {
    let Some(request) = fetch(pool, request_id).await? else {
        return Err(AppError::NotFound("Swap request not found".to_owned()));
    };
    authorize_transition(&request, actor_id, new_status)?;

    sqlx::query("UPDATE swap_requests SET status = ?, updated_at = ? WHERE id = ?")
        .bind(new_status)
        .bind(Utc::now())
        .bind(request_id)
        .execute(pool)
        .await?;

    // Two independent increments; a crash between them can leave the counts
    // out of step.
    if new_status == SwapStatus::Completed {
        sqlx::query("UPDATE users SET total_swaps = total_swaps + 1 WHERE id = ?")
            .bind(&request.requester_id)
            .execute(pool)
            .await?;
        sqlx::query("UPDATE users SET total_swaps = total_swaps + 1 WHERE id = ?")
            .bind(&request.target_user_id)
            .execute(pool)
            .await?;
        tracing::info!(request_id, "swap completed");
    }

    fetch(pool, request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Swap request not found".to_owned()))
}

/// Owner-only, and only while the request has not been acted on: pending and
/// cancelled requests can be removed, everything else is refused.
pub async fn delete(pool: &SqlitePool, request_id: &str, actor_id: &str) -> AppResult<()> {
    let Some(request) = fetch(pool, request_id).await? else {
        return Err(AppError::NotFound("Swap request not found".to_owned()));
    };
    if request.requester_id != actor_id {
        return Err(AppError::PermissionDenied(
            "Can only delete your own requests".to_owned(),
        ));
    }
    if !matches!(request.status, SwapStatus::Pending | SwapStatus::Cancelled) {
        return Err(AppError::PermissionDenied(
            "Cannot delete a request that has been acted on".to_owned(),
        ));
    }

    sqlx::query("DELETE FROM swap_requests WHERE id = ?")
        .bind(request_id)
        .execute(pool)
        .await?;
    Ok(())
}
