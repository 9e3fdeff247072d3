use serde::{Deserialize, Serialize};

use crate::{CODE_ANALYSIS_PATH, Result, SemanticSearchService, normalize, validate};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeAnalysisRequest {
	pub code: String,
	pub language: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeIssue {
	pub severity: String,
	pub message: String,
	pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeAnalysis {
	pub language: String,
	pub complexity: f64,
	pub issues: Vec<CodeIssue>,
	pub suggestions: Vec<String>,
	pub summary: String,
}

impl SemanticSearchService {
	pub async fn analyze_code(&self, req: &CodeAnalysisRequest) -> Result<CodeAnalysis> {
		validate::require_text("code", &req.code)?;
		validate::require_max_chars("code", &req.code, validate::MAX_CODE_CHARS)?;

		let language = validate::require_language(&req.language)?;
		let body = serde_json::json!({ "code": req.code, "language": language });
		let res = self.post_with_retry("analyze_code", CODE_ANALYSIS_PATH, &body).await?;

		Ok(normalize::code_analysis(&res.data, &language))
	}
}
