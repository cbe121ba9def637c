//! Bookmark endpoints
//!
//! PUT/DELETE /api/materials/:id/bookmark, GET /api/bookmarks

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::classification::CourseClassifier;
use crate::db;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::materials::{find_material, MaterialView};

/// Identifies the signed-in user
#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: String,
}

impl UserQuery {
    fn user_id(&self) -> ApiResult<&str> {
        let user_id = self.user_id.trim();
        if user_id.is_empty() {
            return Err(ApiError::BadRequest(
                "Sign in required to bookmark materials".to_string(),
            ));
        }
        Ok(user_id)
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkStatus {
    pub material_id: String,
    pub bookmarked: bool,
}

/// PUT /api/materials/:id/bookmark?user_id=
pub async fn add_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<BookmarkStatus>> {
    let user_id = query.user_id()?;
    find_material(&state, &id).await?;

    let created = db::bookmarks::add(&state.db, user_id, &id).await?;
    tracing::info!(material_id = %id, created, "Bookmark added");

    Ok(Json(BookmarkStatus {
        material_id: id,
        bookmarked: true,
    }))
}

/// DELETE /api/materials/:id/bookmark?user_id=
///
/// Removing a missing bookmark is not an error.
pub async fn remove_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<BookmarkStatus>> {
    let user_id = query.user_id()?;

    let existed = db::bookmarks::remove(&state.db, user_id, &id).await?;
    tracing::info!(material_id = %id, existed, "Bookmark removed");

    Ok(Json(BookmarkStatus {
        material_id: id,
        bookmarked: false,
    }))
}

/// GET /api/bookmarks?user_id=
///
/// The user's bookmarked materials, most recently bookmarked first.
/// Bookmarks whose material no longer exists are skipped.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Vec<MaterialView>>> {
    let user_id = query.user_id()?;

    let ids = db::bookmarks::material_ids_for(&state.db, user_id).await?;
    let ratings = db::ratings::all_stats(&state.db).await?;
    let classifier = CourseClassifier::new(state.overrides.as_ref());

    let mut views = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(material) = state.materials.get(&id).await? {
            let stats = ratings.get(&id).copied().unwrap_or_default();
            views.push(MaterialView::new(material, &classifier, stats));
        }
    }

    Ok(Json(views))
}

pub fn bookmark_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/materials/:id/bookmark",
            put(add_bookmark).delete(remove_bookmark),
        )
        .route("/api/bookmarks", get(list_bookmarks))
}
