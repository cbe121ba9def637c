//! Material ratings
//!
//! One 1-5 star rating per (material, user); rating again replaces it.

use chrono::Utc;
use coursehub_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Lowest accepted star rating
pub const MIN_RATING: u8 = 1;
/// Highest accepted star rating
pub const MAX_RATING: u8 = 5;

/// Aggregate ratings of one material
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingStats {
    /// Mean of all ratings, 0.0 when unrated
    pub average_rating: f64,
    pub total_ratings: u64,
}

/// Insert or replace a user's rating of a material
pub async fn upsert(pool: &SqlitePool, material_id: &str, user_id: &str, rating: u8) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::InvalidInput(format!(
            "rating must be between {} and {}, got {}",
            MIN_RATING, MAX_RATING, rating
        )));
    }
    if user_id.trim().is_empty() {
        return Err(Error::InvalidInput("user_id is required to rate".to_string()));
    }

    let now = Utc::now().to_rfc3339();
    sqlx::query(
        "INSERT INTO ratings (material_id, user_id, rating, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(material_id, user_id) DO UPDATE SET
             rating = excluded.rating,
             updated_at = excluded.updated_at",
    )
    .bind(material_id)
    .bind(user_id)
    .bind(rating as i64)
    .bind(&now)
    .bind(&now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Rating statistics for one material
pub async fn stats_for(pool: &SqlitePool, material_id: &str) -> Result<RatingStats> {
    let (average, count): (Option<f64>, i64) =
        sqlx::query_as("SELECT AVG(rating), COUNT(*) FROM ratings WHERE material_id = ?")
            .bind(material_id)
            .fetch_one(pool)
            .await?;

    Ok(RatingStats {
        average_rating: average.unwrap_or(0.0),
        total_ratings: count as u64,
    })
}

/// Rating statistics for every rated material, keyed by material id
pub async fn all_stats(pool: &SqlitePool) -> Result<HashMap<String, RatingStats>> {
    let rows: Vec<(String, f64, i64)> = sqlx::query_as(
        "SELECT material_id, AVG(rating), COUNT(*) FROM ratings GROUP BY material_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(material_id, average, count)| {
            (
                material_id,
                RatingStats {
                    average_rating: average,
                    total_ratings: count as u64,
                },
            )
        })
        .collect())
}

/// A user's own rating of a material, if any
pub async fn user_rating(pool: &SqlitePool, material_id: &str, user_id: &str) -> Result<Option<u8>> {
    let rating: Option<i64> =
        sqlx::query_scalar("SELECT rating FROM ratings WHERE material_id = ? AND user_id = ?")
            .bind(material_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;

    Ok(rating.map(|r| r as u8))
}
