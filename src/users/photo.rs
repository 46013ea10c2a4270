use std::path::PathBuf;

use axum::{
    Json, debug_handler,
    extract::{Multipart, State},
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{AppError, AppResult, AppState, auth::AuthUser};

/// Accepts a multipart `file` field, writes it under the uploads dir and
/// points the caller's `profile_photo` at it. Only image content types pass.
#[debug_handler(state = AppState)]
pub(crate) async fn upload_photo(
    State(db_pool): State<SqlitePool>,
    State(uploads_dir): State<PathBuf>,
    AuthUser(current): AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<serde_json::Value>> {
    let mut saved: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::InvalidOperation(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if !field.content_type().unwrap_or("").starts_with("image/") {
            return Err(AppError::InvalidOperation(
                "File must be an image".to_owned(),
            ));
        }

        let extension = field
            .file_name()
            .and_then(|name| name.rsplit('.').next())
            .unwrap_or("bin")
            .to_owned();
        let suffix = Uuid::new_v4().simple().to_string();
        let filename = format!("{}_{}.{extension}", current.id, &suffix[..8]);

        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::InvalidOperation(err.to_string()))?;
        tokio::fs::write(uploads_dir.join(&filename), &bytes).await?;
        saved = Some(filename);
        break;
    }

    let Some(filename) = saved else {
        return Err(AppError::InvalidOperation(
            "File must be an image".to_owned(),
        ));
    };

    let photo_url = format!("/uploads/{filename}");
    sqlx::query("UPDATE users SET profile_photo = ? WHERE id = ?")
        .bind(&photo_url)
        .bind(&current.id)
        .execute(&db_pool)
        .await?;

    Ok(Json(serde_json::json!({
        "message": "Profile photo uploaded successfully",
        "photo_url": photo_url,
    })))
}
