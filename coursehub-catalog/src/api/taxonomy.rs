//! School/department taxonomy endpoint

use axum::{extract::State, routing::get, Json, Router};
use coursehub_common::taxonomy::School;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub schools: Vec<School>,
}

/// GET /api/taxonomy
///
/// Schools and their departments in menu order.
pub async fn get_taxonomy(State(state): State<AppState>) -> Json<TaxonomyResponse> {
    Json(TaxonomyResponse {
        schools: state.taxonomy.schools().to_vec(),
    })
}

pub fn taxonomy_routes() -> Router<AppState> {
    Router::new().route("/api/taxonomy", get(get_taxonomy))
}
