mod browse;
mod photo;
mod profile;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(browse::list_users))
        .route("/me", put(profile::update_me))
        .route("/search/{skill}", get(browse::search_by_skill))
        .route("/upload-photo", post(photo::upload_photo))
        .route("/{user_id}", get(profile::user_profile))
}
