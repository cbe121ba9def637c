//! Material catalog endpoints
//!
//! GET /api/materials, GET/PATCH /api/materials/:id, POST /api/materials

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use coursehub_common::{Material, NewMaterial};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::classification::CourseClassifier;
use crate::db::materials::MaterialUpdate;
use crate::db::ratings::{self, RatingStats};
use crate::error::{ApiError, ApiResult};
use crate::filtering::{filter_materials, Selection};
use crate::pagination::paginate;
use crate::AppState;

/// GET /api/materials query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Free-text search
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub page: Option<usize>,
}

/// Material with its derived freshman flag and rating summary
#[derive(Debug, Serialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: Material,
    pub is_freshman: bool,
    #[serde(flatten)]
    pub ratings: RatingStats,
}

impl MaterialView {
    pub fn new(material: Material, classifier: &CourseClassifier<'_>, ratings: RatingStats) -> Self {
        let is_freshman = classifier.classify_material(&material);
        Self {
            material,
            is_freshman,
            ratings,
        }
    }
}

/// One page of a filtered material listing
#[derive(Debug, Serialize)]
pub struct MaterialPage {
    pub total_results: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub materials: Vec<MaterialView>,
}

impl MaterialPage {
    /// Paginate an already filtered list
    ///
    /// `ratings` holds stats for rated materials; anything missing is unrated.
    pub fn build(
        filtered: &[&Material],
        requested_page: usize,
        page_size: usize,
        classifier: &CourseClassifier<'_>,
        ratings: &HashMap<String, RatingStats>,
    ) -> Self {
        let page = paginate(filtered, requested_page, page_size);
        Self {
            total_results: page.total_results,
            page: page.pagination.page,
            page_size: page.pagination.page_size,
            total_pages: page.pagination.total_pages,
            materials: page
                .items
                .into_iter()
                .map(|m| {
                    let stats = ratings.get(&m.id).copied().unwrap_or_default();
                    MaterialView::new(m.clone(), classifier, stats)
                })
                .collect(),
        }
    }
}

/// GET /api/materials
///
/// Text and department/school filters, then pagination.
pub async fn list_materials(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<MaterialPage>> {
    let all = state.materials.list_recent().await?;
    let selection = Selection::from_menu(query.department.as_deref(), query.school.as_deref());
    let filtered = filter_materials(
        &all,
        query.q.as_deref().unwrap_or(""),
        &selection,
        &state.taxonomy,
    );

    tracing::debug!(
        total = all.len(),
        matched = filtered.len(),
        selection = ?selection,
        "Listing materials"
    );

    let ratings = ratings::all_stats(&state.db).await?;
    let classifier = CourseClassifier::new(state.overrides.as_ref());
    Ok(Json(MaterialPage::build(
        &filtered,
        query.page.unwrap_or(1),
        state.page_size,
        &classifier,
        &ratings,
    )))
}

/// Load a material or answer 404
pub(crate) async fn find_material(state: &AppState, id: &str) -> ApiResult<Material> {
    state
        .materials
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Material not found: {}", id)))
}

/// GET /api/materials/:id
pub async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MaterialView>> {
    let material = find_material(&state, &id).await?;
    let stats = ratings::stats_for(&state.db, &id).await?;

    let classifier = CourseClassifier::new(state.overrides.as_ref());
    Ok(Json(MaterialView::new(material, &classifier, stats)))
}

/// POST /api/materials
///
/// Records metadata for a file already placed in storage.
pub async fn create_material(
    State(state): State<AppState>,
    Json(new): Json<NewMaterial>,
) -> ApiResult<(StatusCode, Json<MaterialView>)> {
    if !state.taxonomy.contains_department(new.department.trim()) {
        tracing::warn!(
            department = %new.department,
            "Department is not listed under any school; school filters will skip this material"
        );
    }

    let material = state.materials.insert(new).await?;

    let classifier = CourseClassifier::new(state.overrides.as_ref());
    Ok((
        StatusCode::CREATED,
        Json(MaterialView::new(material, &classifier, RatingStats::default())),
    ))
}

/// PATCH /api/materials/:id
pub async fn update_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<MaterialUpdate>,
) -> ApiResult<Json<MaterialView>> {
    let material = state.materials.update_details(&id, update).await?;
    tracing::info!(material_id = %id, "Material updated");
    let stats = ratings::stats_for(&state.db, &id).await?;

    let classifier = CourseClassifier::new(state.overrides.as_ref());
    Ok(Json(MaterialView::new(material, &classifier, stats)))
}

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials", get(list_materials).post(create_material))
        .route("/api/materials/:id", get(get_material).patch(update_material))
}
