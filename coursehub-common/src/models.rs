//! Material records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Kind of uploaded file, derived from the file name extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileType {
    Pdf,
    Doc,
    Ppt,
    Video,
    Other,
}

impl FileType {
    /// Derive the file type from an uploaded file name
    ///
    /// Extension comparison is case-insensitive. Names without an
    /// extension map to `Other`.
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "pdf" => FileType::Pdf,
            "doc" | "docx" => FileType::Doc,
            "ppt" | "pptx" => FileType::Ppt,
            "mp4" | "avi" | "mov" => FileType::Video,
            _ => FileType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Doc => "DOC",
            FileType::Ppt => "PPT",
            FileType::Video => "VIDEO",
            FileType::Other => "OTHER",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PDF" => Ok(FileType::Pdf),
            "DOC" => Ok(FileType::Doc),
            "PPT" => Ok(FileType::Ppt),
            "VIDEO" => Ok(FileType::Video),
            "OTHER" => Ok(FileType::Other),
            other => Err(format!("Unknown file type: {}", other)),
        }
    }
}

/// One uploaded course resource (file + metadata)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub department: String,
    /// Free-form course code, e.g. "CS101" or "MATH 100"
    pub course: String,
    pub file_type: FileType,
    pub file_name: String,
    pub file_size: Option<i64>,
    /// Storage locator owned by the object store
    pub file_path: String,
    pub created_at: DateTime<Utc>,
    pub uploaded_by: Option<String>,
    pub uploaded_by_user_id: Option<String>,
}

impl Material {
    /// Description or empty string when none was given
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

/// Metadata submitted when a material is created
///
/// There is no file type field: it is derived from `file_name`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub department: String,
    pub course: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: Option<i64>,
    pub file_path: String,
    #[serde(default)]
    pub uploaded_by: Option<String>,
    #[serde(default)]
    pub uploaded_by_user_id: Option<String>,
}

impl NewMaterial {
    pub fn file_type(&self) -> FileType {
        FileType::from_file_name(&self.file_name)
    }
}

/// Format a byte count for display ("512 B", "1.5 KB", "2.0 MB")
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
