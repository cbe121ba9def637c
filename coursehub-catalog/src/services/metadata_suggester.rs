//! AI metadata suggestions for a file being uploaded

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ai_gateway::{extract_json_object, AiGatewayError, CompletionClient};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that analyzes educational materials \
     and generates metadata. Always respond with valid JSON only.";

/// Course code used when none can be determined
pub const PLACEHOLDER_COURSE_CODE: &str = "EDITME001";

const PREVIEW_CHARS: usize = 3000;
const MAX_TITLE_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    pub file_name: String,
    pub department: String,
    /// Text extracted from the file, if any
    #[serde(default)]
    pub file_content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSuggestion {
    #[serde(default)]
    pub course_code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl MetadataSuggestion {
    fn normalized(self) -> Self {
        let course_code = self.course_code.trim();
        Self {
            course_code: if course_code.is_empty() {
                PLACEHOLDER_COURSE_CODE.to_string()
            } else {
                course_code.to_string()
            },
            title: truncate_chars(self.title.trim(), MAX_TITLE_CHARS),
            description: truncate_chars(self.description.trim(), MAX_DESCRIPTION_CHARS),
        }
    }
}

#[derive(Clone)]
pub struct MetadataSuggester {
    client: Arc<dyn CompletionClient>,
}

impl MetadataSuggester {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Ask the AI for course code, title and description
    ///
    /// Errors are returned to the caller; there is no fallback suggestion.
    pub async fn suggest(&self, request: &MetadataRequest) -> Result<MetadataSuggestion, AiGatewayError> {
        let prompt = build_prompt(request);
        let reply = self.client.complete(SYSTEM_PROMPT, &prompt).await?;

        let json = extract_json_object(&reply)
            .ok_or_else(|| AiGatewayError::Parse("Failed to parse AI response".to_string()))?;
        let suggestion: MetadataSuggestion =
            serde_json::from_str(json).map_err(|e| AiGatewayError::Parse(e.to_string()))?;

        tracing::debug!(file_name = %request.file_name, course_code = %suggestion.course_code, "Metadata suggested");
        Ok(suggestion.normalized())
    }
}

fn build_prompt(request: &MetadataRequest) -> String {
    match request.file_content.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(content) => format!(
            "Analyze this educational material file and generate accurate metadata based on its actual content.\n\n\
             File name: \"{file_name}\"\n\
             Department context: {department}\n\n\
             File content preview:\n{preview}\n\n\
             Based on the ACTUAL CONTENT above, generate:\n\
             1. The course code (e.g., CSEN301, MATH201): Extract from the content if present, otherwise use \"{placeholder}\" as placeholder\n\
             2. A clear, descriptive title (max {title_max} characters) that reflects the actual content\n\
             3. A brief description (max {desc_max} characters) summarizing what this material actually contains\n\n\
             Respond in JSON format only:\n\
             {{\n  \"courseCode\": \"extracted or placeholder course code\",\n  \"title\": \"content-based title\",\n  \"description\": \"summary of actual content\"\n}}",
            file_name = request.file_name,
            department = request.department,
            preview = truncate_chars(content, PREVIEW_CHARS),
            placeholder = PLACEHOLDER_COURSE_CODE,
            title_max = MAX_TITLE_CHARS,
            desc_max = MAX_DESCRIPTION_CHARS,
        ),
        None => format!(
            "Given a file named \"{file_name}\" for a {department} department, analyze the filename and generate:\n\
             1. The course code (e.g., CSEN301, MATH201): If present in filename, use that. Otherwise, generate placeholder \"{placeholder}\"\n\
             2. A clear, concise title (max {title_max} characters)\n\
             3. A brief description (max {desc_max} characters) of what this material likely contains\n\n\
             Respond in JSON format:\n\
             {{\n  \"courseCode\": \"course code from filename or placeholder\",\n  \"title\": \"your generated title\",\n  \"description\": \"your generated description\"\n}}",
            file_name = request.file_name,
            department = request.department,
            placeholder = PLACEHOLDER_COURSE_CODE,
            title_max = MAX_TITLE_CHARS,
            desc_max = MAX_DESCRIPTION_CHARS,
        ),
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
