use axum::{Json, debug_handler, extract::State};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    AppError, AppResult, AppState,
    auth::{AuthUser, TokenKeys, password, token, token::TokenResponse},
    db::User,
};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginBody {
    email: String,
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(keys): State<TokenKeys>,
    Json(body): Json<LoginBody>,
) -> AppResult<Json<TokenResponse>> {
    let row: Option<(String, String, bool)> =
        sqlx::query_as("SELECT id, password_hash, is_banned FROM users WHERE email = ?")
            .bind(&body.email)
            .fetch_optional(&db_pool)
            .await?;

    let Some((id, password_hash, is_banned)) = row else {
        return Err(AppError::Unauthorized(
            "Incorrect email or password".to_owned(),
        ));
    };
    if !password::verify(&body.password, &password_hash) {
        return Err(AppError::Unauthorized(
            "Incorrect email or password".to_owned(),
        ));
    }
    if is_banned {
        return Err(AppError::PermissionDenied(
            "Account has been banned".to_owned(),
        ));
    }

    Ok(Json(TokenResponse::bearer(token::issue(&keys, &id)?)))
}

#[debug_handler(state = AppState)]
pub(crate) async fn me(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}
