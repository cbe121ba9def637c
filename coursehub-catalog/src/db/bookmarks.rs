//! Per-user material bookmarks

use chrono::Utc;
use coursehub_common::{Error, Result};
use sqlx::SqlitePool;

/// Bookmark a material; bookmarking twice is a no-op
///
/// Returns whether a new bookmark was created.
pub async fn add(pool: &SqlitePool, user_id: &str, material_id: &str) -> Result<bool> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id is required to bookmark".to_string()));
    }

    let result = sqlx::query(
        "INSERT INTO bookmarks (user_id, material_id, created_at) VALUES (?, ?, ?)
         ON CONFLICT(user_id, material_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(material_id)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove a bookmark; returns whether one existed
pub async fn remove(pool: &SqlitePool, user_id: &str, material_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = ? AND material_id = ?")
        .bind(user_id)
        .bind(material_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Material ids a user bookmarked, most recent first
pub async fn material_ids_for(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>> {
    let ids: Vec<String> = sqlx::query_scalar(
        "SELECT material_id FROM bookmarks WHERE user_id = ? ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids)
}
