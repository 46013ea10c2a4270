mod login;
mod password;
mod register;
mod token;

use axum::{
    Router,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
    routing::{get, post},
};
use sqlx::SqlitePool;

use crate::{AppError, AppState, db::User};

pub use token::TokenKeys;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register::register))
        .route("/login", post(login::login))
        .route("/me", get(login::me))
}

/// The authenticated caller, loaded fresh from the store on every request.
/// The process keeps no session state between calls.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    SqlitePool: FromRef<S>,
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let bearer = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::Unauthorized("Invalid authentication credentials".to_owned())
            })?;

        let keys = TokenKeys::from_ref(state);
        let user_id = token::verify(&keys, bearer)?;

        let db_pool = SqlitePool::from_ref(state);
        let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(&user_id)
            .fetch_optional(&db_pool)
            .await?;

        user.map(Self)
            .ok_or_else(|| AppError::Unauthorized("User not found".to_owned()))
    }
}

/// Same as [`AuthUser`] but additionally requires the admin role.
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    SqlitePool: FromRef<S>,
    TokenKeys: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(AppError::PermissionDenied(
                "Not enough permissions".to_owned(),
            ));
        }
        Ok(Self(user))
    }
}
