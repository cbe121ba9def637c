//! # CourseHub Common Library
//!
//! Shared code for the CourseHub services:
//! - Material records and file type derivation
//! - School/department taxonomy
//! - Bootstrap configuration and root folder resolution
//! - Common error type

pub mod config;
pub mod error;
pub mod models;
pub mod taxonomy;

pub use error::{Error, Result};
pub use models::{FileType, Material, NewMaterial};
pub use taxonomy::{Taxonomy, TaxonomyError};
