use sqlx::SqlitePool;

/// Full recompute over the user's entire rating history, rounded to one
/// decimal place and written back to the user record. O(n) per new rating;
/// fine at this scale.
pub async fn recompute_average(
    pool: &SqlitePool,
    rated_user_id: &str,
) -> Result<f64, sqlx::Error> {
    let scores: Vec<(i64,)> = sqlx::query_as("SELECT rating FROM ratings WHERE rated_user_id = ?")
        .bind(rated_user_id)
        .fetch_all(pool)
        .await?;

    let average = if scores.is_empty() {
        0.0
    } else {
        let sum: f64 = scores.iter().map(|(score,)| *score as f64).sum();
        round_one_decimal(sum / scores.len() as f64)
    };

    sqlx::query("UPDATE users SET rating_average = ? WHERE id = ?")
        .bind(average)
        .bind(rated_user_id)
        .execute(pool)
        .await?;
    Ok(average)
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
