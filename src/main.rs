use std::path::PathBuf;

use skillswap::{AppState, app, auth, db};
use sqlx::sqlite::SqlitePoolOptions;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db_pool = SqlitePoolOptions::new()
        .max_connections(16)
        .connect(&dotenv::var("DATABASE_URL")?)
        .await?;
    db::init(&db_pool).await?;

    let uploads_dir =
        PathBuf::from(dotenv::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_owned()));
    tokio::fs::create_dir_all(&uploads_dir).await?;

    let secret = dotenv::var("JWT_SECRET").unwrap_or_else(|_| "skill-swap-secret-key".to_owned());
    let token_keys = auth::TokenKeys::from_secret(secret.as_bytes());

    let state = AppState {
        db_pool,
        token_keys,
        uploads_dir,
    };

    let addr = dotenv::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
