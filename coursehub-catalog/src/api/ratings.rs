//! Material rating endpoints
//!
//! GET/PUT /api/materials/:id/rating

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::db::ratings::{self, RatingStats, MAX_RATING, MIN_RATING};
use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::materials::find_material;

/// PUT /api/materials/:id/rating request
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub user_id: String,
    /// Star rating; wide integer so out-of-range values get a 400, not a parse failure
    pub rating: i64,
}

/// GET /api/materials/:id/rating query parameters
#[derive(Debug, Default, Deserialize)]
pub struct RatingQuery {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Rating summary of one material, with the caller's own rating when known
#[derive(Debug, Serialize)]
pub struct RatingSummary {
    pub material_id: String,
    #[serde(flatten)]
    pub stats: RatingStats,
    pub user_rating: Option<u8>,
}

/// GET /api/materials/:id/rating
pub async fn get_rating(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<RatingQuery>,
) -> ApiResult<Json<RatingSummary>> {
    find_material(&state, &id).await?;

    let stats = ratings::stats_for(&state.db, &id).await?;
    let user_rating = match query.user_id.as_deref().map(str::trim) {
        Some(user_id) if !user_id.is_empty() => {
            ratings::user_rating(&state.db, &id, user_id).await?
        }
        _ => None,
    };

    Ok(Json(RatingSummary {
        material_id: id,
        stats,
        user_rating,
    }))
}

/// PUT /api/materials/:id/rating
///
/// Rating again replaces the user's earlier rating.
pub async fn rate_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RateRequest>,
) -> ApiResult<Json<RatingSummary>> {
    let rating = u8::try_from(request.rating)
        .ok()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
        .ok_or_else(|| {
            ApiError::BadRequest(format!(
                "rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            ))
        })?;
    let user_id = request.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("Sign in required to rate materials".to_string()));
    }

    find_material(&state, &id).await?;
    ratings::upsert(&state.db, &id, user_id, rating).await?;
    let stats = ratings::stats_for(&state.db, &id).await?;

    tracing::info!(
        material_id = %id,
        rating,
        total_ratings = stats.total_ratings,
        "Material rated"
    );

    Ok(Json(RatingSummary {
        material_id: id,
        stats,
        user_rating: Some(rating),
    }))
}

pub fn rating_routes() -> Router<AppState> {
    Router::new().route("/api/materials/:id/rating", get(get_rating).put(rate_material))
}
