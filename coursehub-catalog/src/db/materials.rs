//! Material catalog persistence
//!
//! Listing is most-recent-first; filtering and classification happen in
//! memory on the listed records. The only query-side filter is the cheap
//! structural pre-filter used by the duplicate detector.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use coursehub_common::{Error, FileType, Material, NewMaterial, Result};
use serde::Deserialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::services::duplicate_detector::{CandidateSource, DuplicateCheckRequest};

const MATERIAL_COLUMNS: &str = "id, title, description, department, course, file_type, \
     file_name, file_size, file_path, created_at, uploaded_by, uploaded_by_user_id";

/// Mutable material fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaterialUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// SQLite-backed material repository
#[derive(Clone)]
pub struct MaterialRepository {
    pool: SqlitePool,
}

impl MaterialRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a material record
    ///
    /// The file type is derived from the file name; id and creation time
    /// are assigned here.
    pub async fn insert(&self, new: NewMaterial) -> Result<Material> {
        self.insert_at(new, Utc::now()).await
    }

    /// Insert with an explicit creation time (imports, tests)
    pub async fn insert_at(&self, new: NewMaterial, created_at: DateTime<Utc>) -> Result<Material> {
        validate_new_material(&new)?;

        let material = Material {
            id: Uuid::new_v4().to_string(),
            file_type: new.file_type(),
            title: new.title.trim().to_string(),
            description: new.description.filter(|d| !d.trim().is_empty()),
            department: new.department,
            course: new.course,
            file_name: new.file_name,
            file_size: new.file_size,
            file_path: new.file_path,
            // Stored with microsecond precision
            created_at: created_at.trunc_subsecs(6),
            uploaded_by: new.uploaded_by,
            uploaded_by_user_id: new.uploaded_by_user_id,
        };

        sqlx::query(
            r#"
            INSERT INTO materials (id, title, description, department, course, file_type,
                                   file_name, file_size, file_path, created_at,
                                   uploaded_by, uploaded_by_user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&material.id)
        .bind(&material.title)
        .bind(&material.description)
        .bind(&material.department)
        .bind(&material.course)
        .bind(material.file_type.as_str())
        .bind(&material.file_name)
        .bind(material.file_size)
        .bind(&material.file_path)
        .bind(format_timestamp(&material.created_at))
        .bind(&material.uploaded_by)
        .bind(&material.uploaded_by_user_id)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            material_id = %material.id,
            course = %material.course,
            department = %material.department,
            file_type = %material.file_type,
            "Material created"
        );

        Ok(material)
    }

    /// Load one material by id
    pub async fn get(&self, id: &str) -> Result<Option<Material>> {
        let row = sqlx::query(&format!("SELECT {} FROM materials WHERE id = ?", MATERIAL_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(material_from_row).transpose()
    }

    /// All materials, most recent first
    pub async fn list_recent(&self) -> Result<Vec<Material>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM materials ORDER BY created_at DESC, rowid DESC",
            MATERIAL_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(material_from_row).collect()
    }

    /// Update title and/or description
    ///
    /// A blank description clears it. Returns the updated record.
    pub async fn update_details(&self, id: &str, update: MaterialUpdate) -> Result<Material> {
        if let Some(title) = &update.title {
            if title.trim().is_empty() {
                return Err(Error::InvalidInput("title must not be empty".to_string()));
            }
        }

        let mut material = self
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("material {}", id)))?;

        if let Some(title) = update.title {
            material.title = title.trim().to_string();
        }
        if let Some(description) = update.description {
            material.description = Some(description).filter(|d| !d.trim().is_empty());
        }

        sqlx::query("UPDATE materials SET title = ?, description = ? WHERE id = ?")
            .bind(&material.title)
            .bind(&material.description)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(material)
    }

    /// Same-department materials whose course or file name contains the
    /// given terms (case-insensitive), most recent first
    ///
    /// Blank terms are skipped; with both blank there are no candidates.
    pub async fn find_similar(
        &self,
        department: &str,
        course: &str,
        file_name: &str,
    ) -> Result<Vec<Material>> {
        let course = course.trim();
        let file_name = file_name.trim();

        let mut conditions = Vec::new();
        let mut patterns = Vec::new();
        if !course.is_empty() {
            conditions.push(r"course LIKE ? ESCAPE '\'");
            patterns.push(like_pattern(course));
        }
        if !file_name.is_empty() {
            conditions.push(r"file_name LIKE ? ESCAPE '\'");
            patterns.push(like_pattern(file_name));
        }
        if conditions.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM materials WHERE department = ? AND ({}) \
             ORDER BY created_at DESC, rowid DESC",
            MATERIAL_COLUMNS,
            conditions.join(" OR ")
        );

        let mut query = sqlx::query(&sql).bind(department);
        for pattern in &patterns {
            query = query.bind(pattern.as_str());
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(material_from_row).collect()
    }
}

#[async_trait]
impl CandidateSource for MaterialRepository {
    async fn find_candidates(&self, request: &DuplicateCheckRequest) -> Result<Vec<Material>> {
        self.find_similar(&request.department, &request.course, &request.file_name)
            .await
    }
}

fn validate_new_material(new: &NewMaterial) -> Result<()> {
    let required = [
        ("title", &new.title),
        ("department", &new.department),
        ("file_name", &new.file_name),
        ("file_path", &new.file_path),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(Error::InvalidInput(format!("{} must not be empty", field)));
        }
    }

    Ok(())
}

/// `%term%` with LIKE wildcards in the term escaped
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

// Fixed-width UTC format so text ordering equals time ordering
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn material_from_row(row: &SqliteRow) -> Result<Material> {
    let file_type: String = row.try_get("file_type")?;
    let file_type = file_type
        .parse::<FileType>()
        .map_err(Error::Internal)?;

    let created_at: String = row.try_get("created_at")?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| Error::Internal(format!("Invalid created_at '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    Ok(Material {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        department: row.try_get("department")?,
        course: row.try_get("course")?,
        file_type,
        file_name: row.try_get("file_name")?,
        file_size: row.try_get("file_size")?,
        file_path: row.try_get("file_path")?,
        created_at,
        uploaded_by: row.try_get("uploaded_by")?,
        uploaded_by_user_id: row.try_get("uploaded_by_user_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_memory_pool;
    use chrono::Duration;

    fn new_material(title: &str, course: &str, department: &str, file_name: &str) -> NewMaterial {
        NewMaterial {
            title: title.to_string(),
            description: None,
            department: department.to_string(),
            course: course.to_string(),
            file_name: file_name.to_string(),
            file_size: Some(2048),
            file_path: format!("uploads/{}", file_name),
            uploaded_by: Some("Admin".to_string()),
            uploaded_by_user_id: None,
        }
    }

    async fn setup() -> MaterialRepository {
        MaterialRepository::new(init_memory_pool().await.unwrap())
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("CS101"), "%CS101%");
        assert_eq!(like_pattern("100%_done"), r"%100\%\_done%");
        assert_eq!(like_pattern(r"a\b"), r"%a\\b%");
    }

    #[tokio::test]
    async fn test_insert_derives_file_type() {
        let repo = setup().await;
        let material = repo
            .insert(new_material("Lecture 1", "CS101", "Computer Science", "lecture1.PPTX"))
            .await
            .unwrap();

        assert_eq!(material.file_type, FileType::Ppt);

        let loaded = repo.get(&material.id).await.unwrap().unwrap();
        assert_eq!(loaded, material);
    }

    #[tokio::test]
    async fn test_insert_rejects_blank_title() {
        let repo = setup().await;
        let result = repo
            .insert(new_material("  ", "CS101", "Computer Science", "a.pdf"))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let repo = setup().await;
        let now = Utc::now();
        let old = repo
            .insert_at(new_material("Old", "CS101", "Computer Science", "old.pdf"), now - Duration::days(2))
            .await
            .unwrap();
        let new = repo
            .insert_at(new_material("New", "CS102", "Computer Science", "new.pdf"), now)
            .await
            .unwrap();

        let listed = repo.list_recent().await.unwrap();
        let ids: Vec<_> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, [new.id.as_str(), old.id.as_str()]);
    }

    #[tokio::test]
    async fn test_update_details() {
        let repo = setup().await;
        let material = repo
            .insert(new_material("Draft", "MATH101", "Mathematics", "calc.pdf"))
            .await
            .unwrap();

        let updated = repo
            .update_details(
                &material.id,
                MaterialUpdate {
                    title: Some("Calculus I Notes".to_string()),
                    description: Some("Limits and derivatives".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Calculus I Notes");
        assert_eq!(updated.description.as_deref(), Some("Limits and derivatives"));
        assert_eq!(updated.created_at, material.created_at);

        let cleared = repo
            .update_details(
                &material.id,
                MaterialUpdate {
                    title: None,
                    description: Some(String::new()),
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.title, "Calculus I Notes");
        assert!(cleared.description.is_none());
    }

    #[tokio::test]
    async fn test_update_missing_material() {
        let repo = setup().await;
        let result = repo.update_details("nope", MaterialUpdate::default()).await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_find_similar_is_department_scoped_and_case_insensitive() {
        let repo = setup().await;
        repo.insert(new_material("Algorithms", "CS301", "Computer Science", "algo_notes.pdf"))
            .await
            .unwrap();
        repo.insert(new_material("Algorithms", "CS301", "Software Engineering", "algo_notes.pdf"))
            .await
            .unwrap();
        repo.insert(new_material("Networks", "CS350", "Computer Science", "networks.pdf"))
            .await
            .unwrap();

        let by_course = repo.find_similar("Computer Science", "cs301", "").await.unwrap();
        assert_eq!(by_course.len(), 1);
        assert_eq!(by_course[0].department, "Computer Science");

        let by_file = repo
            .find_similar("Computer Science", "", "NETWORKS")
            .await
            .unwrap();
        assert_eq!(by_file.len(), 1);
        assert_eq!(by_file[0].title, "Networks");

        let either = repo
            .find_similar("Computer Science", "CS301", "networks")
            .await
            .unwrap();
        assert_eq!(either.len(), 2);
    }

    #[tokio::test]
    async fn test_find_similar_blank_terms_yield_nothing() {
        let repo = setup().await;
        repo.insert(new_material("Algorithms", "CS301", "Computer Science", "algo.pdf"))
            .await
            .unwrap();

        assert!(repo.find_similar("Computer Science", " ", "").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_similar_wildcards_are_literal() {
        let repo = setup().await;
        repo.insert(new_material("Algorithms", "CS301", "Computer Science", "algo.pdf"))
            .await
            .unwrap();

        assert!(repo.find_similar("Computer Science", "%", "").await.unwrap().is_empty());
        assert!(repo.find_similar("Computer Science", "CS_01", "").await.unwrap().is_empty());
    }
}
