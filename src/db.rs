use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqlitePool, types::Json};

/// A marketplace member. `password_hash` lives only in the `users` table and
/// is never selected into this struct, so it cannot leak into a response.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub bio: Option<String>,
    pub skills_offered: Json<Vec<String>>,
    pub skills_wanted: Json<Vec<String>>,
    pub availability: Option<String>,
    pub is_public: bool,
    pub role: String,
    pub is_banned: bool,
    pub rating_average: f64,
    pub total_swaps: i64,
    pub created_at: DateTime<Utc>,
    // unique: id
    // unique: email
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum SwapStatus {
    Pending,
    Accepted,
    Rejected,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct SwapRequest {
    pub id: String,
    pub requester_id: String,
    pub target_user_id: String,
    pub requested_skill: String,
    pub offered_skill: String,
    pub status: SwapStatus,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // unique: id
    // invariant: requester_id != target_user_id
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Rating {
    pub id: String,
    pub swap_request_id: String,
    pub rater_id: String,
    pub rated_user_id: String,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    // unique: id
    // unique: swap_request_id, rater_id
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    location TEXT,
    profile_photo TEXT,
    bio TEXT,
    skills_offered TEXT NOT NULL DEFAULT '[]',
    skills_wanted TEXT NOT NULL DEFAULT '[]',
    availability TEXT,
    is_public INTEGER NOT NULL DEFAULT 1,
    role TEXT NOT NULL DEFAULT 'user',
    is_banned INTEGER NOT NULL DEFAULT 0,
    rating_average REAL NOT NULL DEFAULT 0.0,
    total_swaps INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS swap_requests (
    id TEXT PRIMARY KEY,
    requester_id TEXT NOT NULL,
    target_user_id TEXT NOT NULL,
    requested_skill TEXT NOT NULL,
    offered_skill TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'pending',
    message TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ratings (
    id TEXT PRIMARY KEY,
    swap_request_id TEXT NOT NULL,
    rater_id TEXT NOT NULL,
    rated_user_id TEXT NOT NULL,
    rating INTEGER NOT NULL,
    comment TEXT,
    created_at TEXT NOT NULL,
    UNIQUE (swap_request_id, rater_id)
);
";

pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}
