use axum::{Json, debug_handler, extract::State};
use chrono::Utc;
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    AppError, AppResult, AppState, db,
    auth::{TokenKeys, password, token, token::TokenResponse},
};

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterBody {
    name: String,
    email: String,
    password: String,
    location: Option<String>,
    bio: Option<String>,
    #[serde(default)]
    skills_offered: Vec<String>,
    #[serde(default)]
    skills_wanted: Vec<String>,
    availability: Option<String>,
    #[serde(default = "default_public")]
    is_public: bool,
}

fn default_public() -> bool {
    true
}

#[debug_handler(state = AppState)]
pub(crate) async fn register(
    State(db_pool): State<SqlitePool>,
    State(keys): State<TokenKeys>,
    Json(body): Json<RegisterBody>,
) -> AppResult<Json<TokenResponse>> {
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&body.email)
        .fetch_optional(&db_pool)
        .await?;
    if existing.is_some() {
        return Err(AppError::InvalidOperation(
            "Email already registered".to_owned(),
        ));
    }

    let id = Uuid::new_v4().to_string();
    let password_hash = password::hash(&body.password)?;
    let inserted = sqlx::query(
        "INSERT INTO users
            (id, name, email, password_hash, location, bio,
             skills_offered, skills_wanted, availability, is_public, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&body.name)
    .bind(&body.email)
    .bind(&password_hash)
    .bind(&body.location)
    .bind(&body.bio)
    .bind(sqlx::types::Json(&body.skills_offered))
    .bind(sqlx::types::Json(&body.skills_wanted))
    .bind(&body.availability)
    .bind(body.is_public)
    .bind(Utc::now())
    .execute(&db_pool)
    .await;

    match inserted {
        Ok(_) => {}
        // The unique constraint backs the pre-check under concurrent registration.
        Err(err) if db::is_unique_violation(&err) => {
            return Err(AppError::InvalidOperation(
                "Email already registered".to_owned(),
            ));
        }
        Err(err) => return Err(err.into()),
    }

    tracing::info!(user_id = %id, "registered new user");
    Ok(Json(TokenResponse::bearer(token::issue(&keys, &id)?)))
}
