//! Duplicate check endpoints
//!
//! AI failures never surface here: the detector answers with its
//! conservative fail-safe result instead.

use axum::{extract::State, routing::post, Json, Router};
use coursehub_common::Taxonomy;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::services::{DuplicateCheckRequest, DuplicateCheckResult};
use crate::AppState;

/// POST /api/materials/check-duplicates request
#[derive(Debug, Deserialize)]
pub struct BatchCheckRequest {
    pub files: Vec<DuplicateCheckRequest>,
}

/// POST /api/materials/check-duplicate
pub async fn check_duplicate(
    State(state): State<AppState>,
    Json(mut request): Json<DuplicateCheckRequest>,
) -> ApiResult<Json<DuplicateCheckResult>> {
    validate(&request)?;
    fill_school(&mut request, &state.taxonomy);
    let result = state.detector.check(&state.materials, &request).await?;
    Ok(Json(result))
}

/// POST /api/materials/check-duplicates
///
/// Files are checked one at a time in submission order.
pub async fn check_duplicates(
    State(state): State<AppState>,
    Json(mut batch): Json<BatchCheckRequest>,
) -> ApiResult<Json<Vec<DuplicateCheckResult>>> {
    for request in &mut batch.files {
        validate(request)?;
        fill_school(request, &state.taxonomy);
    }

    tracing::debug!(files = batch.files.len(), "Checking batch for duplicates");
    let results = state.detector.check_batch(&state.materials, &batch.files).await?;
    Ok(Json(results))
}

fn validate(request: &DuplicateCheckRequest) -> ApiResult<()> {
    if request.department.trim().is_empty() {
        return Err(ApiError::BadRequest("department is required".to_string()));
    }
    if request.file_name.trim().is_empty() && request.course.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "file name or course is required".to_string(),
        ));
    }
    Ok(())
}

/// Derive the school from the department when the client left it blank
fn fill_school(request: &mut DuplicateCheckRequest, taxonomy: &Taxonomy) {
    if !request.school.trim().is_empty() {
        return;
    }
    if let Some(school) = taxonomy.school_of(request.department.trim()) {
        request.school = school.to_string();
    }
}

pub fn duplicate_routes() -> Router<AppState> {
    Router::new()
        .route("/api/materials/check-duplicate", post(check_duplicate))
        .route("/api/materials/check-duplicates", post(check_duplicates))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(department: &str, school: &str) -> DuplicateCheckRequest {
        DuplicateCheckRequest {
            course: "CS101".to_string(),
            department: department.to_string(),
            school: school.to_string(),
            file_name: "lecture1.pdf".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_fill_school_from_department() {
        let taxonomy = Taxonomy::default();

        let mut blank = request("Computer Science", "");
        fill_school(&mut blank, &taxonomy);
        assert_eq!(blank.school, "School of EiTm");

        let mut given = request("Computer Science", "Main Campus");
        fill_school(&mut given, &taxonomy);
        assert_eq!(given.school, "Main Campus");

        let mut unknown = request("Astrology", "");
        fill_school(&mut unknown, &taxonomy);
        assert_eq!(unknown.school, "");
    }
}
