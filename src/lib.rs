pub mod admin;
pub mod auth;
pub mod db;
pub mod error;
pub mod ratings;
pub mod swaps;
pub mod users;

use std::path::PathBuf;

use axum::{Router, extract::FromRef};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use error::{AppError, AppResult};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub token_keys: auth::TokenKeys,
    pub uploads_dir: PathBuf,
}

/// Full application router: the JSON API under /api plus static serving of
/// uploaded profile photos under /uploads.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/swap-requests", swaps::router())
        .nest("/ratings", ratings::router())
        .nest("/admin", admin::router());

    Router::new()
        .nest("/api", api)
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
