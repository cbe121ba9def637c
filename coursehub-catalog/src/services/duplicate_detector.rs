//! Duplicate material detection
//!
//! A cheap structural search narrows the catalog to candidates in the same
//! department with a similar course or file name. Only when candidates exist
//! is the AI asked to judge them. If that judgment cannot be obtained the
//! result errs towards "duplicate" so the uploader is prompted to look.

use async_trait::async_trait;
use coursehub_common::models::format_file_size;
use coursehub_common::{FileType, Material, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ai_gateway::{extract_json_object, AiGatewayError, CompletionClient};

const SYSTEM_PROMPT: &str =
    "You are a duplicate detection expert. Always respond with valid JSON only, no markdown formatting.";

/// Reason reported when no structural candidate exists
pub const NO_CANDIDATES_REASON: &str = "No similar materials found. You can proceed with the upload.";

/// Reason reported when the AI judgment is unavailable
pub const FAIL_SAFE_REASON: &str =
    "AI analysis unavailable. Found similar materials based on name and course.";

const FAIL_SAFE_LIMIT: usize = 5;
const DEFAULT_SIMILAR_LIMIT: usize = 3;

/// Metadata of a file about to be uploaded
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckRequest {
    #[serde(default)]
    pub title: String,
    #[serde(alias = "courseName")]
    pub course: String,
    pub department: String,
    #[serde(default)]
    pub school: String,
    pub file_name: String,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DuplicateCheckRequest {
    pub fn file_type(&self) -> FileType {
        FileType::from_file_name(&self.file_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Outcome of one duplicate check
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCheckResult {
    pub is_duplicate: bool,
    pub confidence: Confidence,
    pub reason: String,
    pub similar_materials: Vec<Material>,
}

impl DuplicateCheckResult {
    /// Nothing similar exists; the upload can proceed
    pub fn no_candidates() -> Self {
        Self {
            is_duplicate: false,
            confidence: Confidence::High,
            reason: NO_CANDIDATES_REASON.to_string(),
            similar_materials: Vec::new(),
        }
    }

    /// Conservative answer used when the AI judgment is unavailable
    pub fn fail_safe(candidates: &[Material]) -> Self {
        Self {
            is_duplicate: true,
            confidence: Confidence::Low,
            reason: FAIL_SAFE_REASON.to_string(),
            similar_materials: candidates.iter().take(FAIL_SAFE_LIMIT).cloned().collect(),
        }
    }

    pub fn is_duplicate(&self) -> bool {
        self.is_duplicate
    }
}

/// Source of structurally similar existing materials
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// Same department and similar course or file name, most recent first
    async fn find_candidates(&self, request: &DuplicateCheckRequest) -> Result<Vec<Material>>;
}

/// AI judgment as returned by the completion endpoint
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiVerdict {
    is_duplicate: bool,
    confidence: Confidence,
    reason: String,
    #[serde(default)]
    similar_material_ids: Vec<String>,
}

/// Duplicate detector over an injected completion client
#[derive(Clone)]
pub struct DuplicateDetector {
    client: Arc<dyn CompletionClient>,
}

impl DuplicateDetector {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Check one candidate upload against the catalog
    ///
    /// Only candidate search errors are returned; every failure of the AI
    /// call degrades to [`DuplicateCheckResult::fail_safe`].
    pub async fn check(
        &self,
        source: &dyn CandidateSource,
        request: &DuplicateCheckRequest,
    ) -> Result<DuplicateCheckResult> {
        tracing::debug!(
            file_name = %request.file_name,
            course = %request.course,
            department = %request.department,
            "Checking for duplicates"
        );

        let candidates = source.find_candidates(request).await?;
        if candidates.is_empty() {
            tracing::debug!(file_name = %request.file_name, "No similar materials found");
            return Ok(DuplicateCheckResult::no_candidates());
        }

        let prompt = build_prompt(request, &candidates);
        let verdict = match self.client.complete(SYSTEM_PROMPT, &prompt).await {
            Ok(reply) => parse_verdict(&reply),
            Err(e) => Err(e),
        };

        match verdict {
            Ok(verdict) => {
                tracing::info!(
                    file_name = %request.file_name,
                    is_duplicate = verdict.is_duplicate,
                    confidence = ?verdict.confidence,
                    candidates = candidates.len(),
                    "AI duplicate analysis complete"
                );
                Ok(apply_verdict(verdict, candidates))
            }
            Err(e) => {
                tracing::warn!(
                    file_name = %request.file_name,
                    candidates = candidates.len(),
                    error = %e,
                    "AI analysis unavailable, assuming duplicate"
                );
                Ok(DuplicateCheckResult::fail_safe(&candidates))
            }
        }
    }

    /// Check a batch one request at a time, in input order
    pub async fn check_batch(
        &self,
        source: &dyn CandidateSource,
        requests: &[DuplicateCheckRequest],
    ) -> Result<Vec<DuplicateCheckResult>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.check(source, request).await?);
        }
        Ok(results)
    }
}

fn parse_verdict(reply: &str) -> std::result::Result<AiVerdict, AiGatewayError> {
    let json = extract_json_object(reply)
        .ok_or_else(|| AiGatewayError::Parse("no JSON object in AI reply".to_string()))?;
    serde_json::from_str(json).map_err(|e| AiGatewayError::Parse(e.to_string()))
}

fn apply_verdict(verdict: AiVerdict, candidates: Vec<Material>) -> DuplicateCheckResult {
    let named: Vec<Material> = candidates
        .iter()
        .filter(|m| verdict.similar_material_ids.iter().any(|id| id == &m.id))
        .cloned()
        .collect();

    let similar_materials = if named.is_empty() {
        candidates.into_iter().take(DEFAULT_SIMILAR_LIMIT).collect()
    } else {
        named
    };

    DuplicateCheckResult {
        is_duplicate: verdict.is_duplicate,
        confidence: verdict.confidence,
        reason: verdict.reason,
        similar_materials,
    }
}

/// Comparison prompt: the new file's metadata followed by every candidate
pub fn build_prompt(request: &DuplicateCheckRequest, candidates: &[Material]) -> String {
    let mut prompt = String::from(
        "You are a smart duplicate detection system for an academic material platform.\n\n\
         I'm about to upload a file with these details:\n",
    );

    if !request.title.trim().is_empty() {
        prompt.push_str(&format!("- Title: {}\n", request.title));
    }
    prompt.push_str(&format!("- File Name: {}\n", request.file_name));
    prompt.push_str(&format!("- File Type: {}\n", request.file_type()));
    if let Some(size) = request.file_size {
        prompt.push_str(&format!("- File Size: {}\n", format_file_size(size)));
    }
    prompt.push_str(&format!("- Course: {}\n", request.course));
    prompt.push_str(&format!("- Department: {}\n", request.department));
    if !request.school.trim().is_empty() {
        prompt.push_str(&format!("- School: {}\n", request.school));
    }
    prompt.push_str(&format!(
        "- Description: {}\n",
        non_blank(request.description.as_deref()).unwrap_or("No description provided")
    ));

    prompt.push_str("\nI found these existing materials in the database:\n");
    for (i, m) in candidates.iter().enumerate() {
        prompt.push_str(&format!(
            "\n{}. ID: {}\n   Title: {}\n   File Name: {}\n   Course: {}\n   Type: {}\n   Description: {}\n   Uploaded: {}\n",
            i + 1,
            m.id,
            m.title,
            m.file_name,
            m.course,
            m.file_type,
            non_blank(m.description.as_deref()).unwrap_or("No description"),
            m.created_at.format("%Y-%m-%d"),
        ));
    }

    prompt.push_str(
        "\nAnalyze if the new file is likely a duplicate of any existing material. Consider:\n\
         - Similar file names (but account for different versions, chapters, or years)\n\
         - Same course and department\n\
         - Similar descriptions\n\
         - File types\n\n\
         Respond in JSON format:\n\
         {\n  \"isDuplicate\": true/false,\n  \"confidence\": \"high\"/\"medium\"/\"low\",\n  \
         \"reason\": \"Brief explanation why this might be a duplicate or not\",\n  \
         \"similarMaterialIds\": [array of IDs that are most similar]\n}",
    );

    prompt
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}
