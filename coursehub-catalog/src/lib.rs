//! coursehub-catalog library - course material catalog service
//!
//! Freshman classification, browsing filters, pagination, ratings and
//! bookmarks, and AI-assisted duplicate detection over the SQLite material
//! catalog.

use axum::Router;
use coursehub_common::{Result, Taxonomy};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod classification;
pub mod db;
pub mod error;
pub mod filtering;
pub mod overrides;
pub mod pagination;
pub mod services;

use db::MaterialRepository;
use overrides::MemoryOverrideStore;
use services::{CompletionClient, DuplicateDetector, MetadataSuggester};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub materials: MaterialRepository,
    /// Process-wide override snapshot, written through to `freshman_overrides`
    pub overrides: Arc<MemoryOverrideStore>,
    pub taxonomy: Arc<Taxonomy>,
    pub detector: DuplicateDetector,
    pub suggester: MetadataSuggester,
    pub page_size: usize,
}

impl AppState {
    /// Create application state with an explicit override snapshot
    pub fn new(
        db: SqlitePool,
        taxonomy: Taxonomy,
        ai_client: Arc<dyn CompletionClient>,
        overrides: MemoryOverrideStore,
        page_size: usize,
    ) -> Self {
        Self {
            materials: MaterialRepository::new(db.clone()),
            db,
            overrides: Arc::new(overrides),
            taxonomy: Arc::new(taxonomy),
            detector: DuplicateDetector::new(ai_client.clone()),
            suggester: MetadataSuggester::new(ai_client),
            page_size: page_size.max(1),
        }
    }

    /// Create application state, hydrating overrides from the database
    pub async fn load(
        db: SqlitePool,
        taxonomy: Taxonomy,
        ai_client: Arc<dyn CompletionClient>,
        page_size: usize,
    ) -> Result<Self> {
        let entries = db::overrides::load_all(&db).await?;
        tracing::info!(count = entries.len(), "Loaded freshman overrides");

        Ok(Self::new(
            db,
            taxonomy,
            ai_client,
            MemoryOverrideStore::with_entries(entries),
            page_size,
        ))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::taxonomy_routes())
        .merge(api::material_routes())
        .merge(api::freshman_routes())
        .merge(api::duplicate_routes())
        .merge(api::suggest_routes())
        .merge(api::rating_routes())
        .merge(api::bookmark_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
