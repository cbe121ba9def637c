//! AI metadata suggestion endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::services::{MetadataRequest, MetadataSuggestion};
use crate::AppState;

/// POST /api/materials/suggest-metadata
///
/// Gateway failures are reported as 502; there is no default suggestion.
pub async fn suggest_metadata(
    State(state): State<AppState>,
    Json(request): Json<MetadataRequest>,
) -> ApiResult<Json<MetadataSuggestion>> {
    if request.file_name.trim().is_empty() {
        return Err(ApiError::BadRequest("fileName is required".to_string()));
    }

    let suggestion = state.suggester.suggest(&request).await?;
    Ok(Json(suggestion))
}

pub fn suggest_routes() -> Router<AppState> {
    Router::new().route("/api/materials/suggest-metadata", post(suggest_metadata))
}
