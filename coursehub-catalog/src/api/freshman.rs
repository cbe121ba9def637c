//! Freshman course listing and administrator overrides

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::classification::CourseClassifier;
use crate::db;
use crate::error::ApiResult;
use crate::filtering::matches_query;
use crate::overrides::OverrideStore;
use crate::AppState;

use super::materials::{find_material, MaterialPage};

/// GET /api/materials/freshman query parameters
#[derive(Debug, Default, Deserialize)]
pub struct FreshmanQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

/// PUT /api/materials/:id/freshman-override request
#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    pub value: bool,
}

/// Freshman status of one material after an override change
#[derive(Debug, Serialize)]
pub struct FreshmanStatus {
    pub material_id: String,
    pub is_freshman: bool,
    /// Whether an override is now in effect
    pub overridden: bool,
}

/// GET /api/materials/freshman
///
/// Freshman materials only, then the text filter, then pagination.
pub async fn list_freshman(
    State(state): State<AppState>,
    Query(query): Query<FreshmanQuery>,
) -> ApiResult<Json<MaterialPage>> {
    let all = state.materials.list_recent().await?;
    let classifier = CourseClassifier::new(state.overrides.as_ref());

    let text = query.q.as_deref().unwrap_or("");
    let filtered: Vec<_> = classifier
        .freshman_materials(&all)
        .into_iter()
        .filter(|m| matches_query(m, text))
        .collect();

    tracing::debug!(total = all.len(), matched = filtered.len(), "Listing freshman materials");

    let ratings = db::ratings::all_stats(&state.db).await?;
    Ok(Json(MaterialPage::build(
        &filtered,
        query.page.unwrap_or(1),
        state.page_size,
        &classifier,
        &ratings,
    )))
}

/// PUT /api/materials/:id/freshman-override
pub async fn set_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<OverrideRequest>,
) -> ApiResult<Json<FreshmanStatus>> {
    find_material(&state, &id).await?;

    db::overrides::upsert(&state.db, &id, request.value).await?;
    CourseClassifier::new(state.overrides.as_ref()).set_override(&id, request.value);

    tracing::info!(material_id = %id, value = request.value, "Freshman override set");

    Ok(Json(FreshmanStatus {
        material_id: id,
        is_freshman: request.value,
        overridden: true,
    }))
}

/// DELETE /api/materials/:id/freshman-override
///
/// Clearing a missing override is not an error.
pub async fn clear_override(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<FreshmanStatus>> {
    let material = find_material(&state, &id).await?;

    db::overrides::delete(&state.db, &id).await?;
    let classifier = CourseClassifier::new(state.overrides.as_ref());
    let existed = classifier.clear_override(&id);

    tracing::info!(material_id = %id, existed, "Freshman override cleared");

    Ok(Json(FreshmanStatus {
        is_freshman: classifier.classify_material(&material),
        overridden: state.overrides.get(&id).is_some(),
        material_id: id,
    }))
}

pub fn freshman_routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials/freshman", get(list_freshman))
        .route(
            "/api/materials/:id/freshman-override",
            put(set_override).delete(clear_override),
        )
}
