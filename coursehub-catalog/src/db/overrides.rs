//! Persisted freshman overrides
//!
//! Backing table for the in-memory override store: loaded once at startup,
//! written through on every change.

use chrono::Utc;
use coursehub_common::Result;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Load every stored override
pub async fn load_all(pool: &SqlitePool) -> Result<HashMap<String, bool>> {
    let rows: Vec<(String, i64)> =
        sqlx::query_as("SELECT material_id, value FROM freshman_overrides")
            .fetch_all(pool)
            .await?;

    Ok(rows
        .into_iter()
        .map(|(material_id, value)| (material_id, value != 0))
        .collect())
}

/// Insert or replace an override
pub async fn upsert(pool: &SqlitePool, material_id: &str, value: bool) -> Result<()> {
    sqlx::query(
        "INSERT INTO freshman_overrides (material_id, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(material_id) DO UPDATE SET
             value = excluded.value,
             updated_at = excluded.updated_at",
    )
    .bind(material_id)
    .bind(value as i64)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete an override; returns whether a row existed
pub async fn delete(pool: &SqlitePool, material_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM freshman_overrides WHERE material_id = ?")
        .bind(material_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
