//! HTTP API handlers for coursehub-catalog

pub mod bookmarks;
pub mod duplicates;
pub mod freshman;
pub mod health;
pub mod materials;
pub mod ratings;
pub mod suggest;
pub mod taxonomy;

pub use bookmarks::bookmark_routes;
pub use duplicates::duplicate_routes;
pub use freshman::freshman_routes;
pub use health::health_routes;
pub use materials::material_routes;
pub use ratings::rating_routes;
pub use suggest::suggest_routes;
pub use taxonomy::taxonomy_routes;
