use crate::{Result, SemanticSearchError};

pub const MAX_CODE_CHARS: usize = 100_000;
pub const SUPPORTED_LANGUAGES: [&str; 11] = [
	"python",
	"javascript",
	"typescript",
	"rust",
	"go",
	"java",
	"c",
	"cpp",
	"csharp",
	"ruby",
	"php",
];

/// True when a suggestion query should short-circuit to an empty result.
/// Blank input always does, whatever the minimum.
pub fn is_short_query(query: &str, min_query_length: usize) -> bool {
	let trimmed = query.trim();

	trimmed.is_empty() || trimmed.chars().count() < min_query_length
}

pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(SemanticSearchError::validation(format!("{field} must be non-empty.")));
	}

	Ok(trimmed)
}

pub fn require_max_chars(field: &str, value: &str, max: usize) -> Result<()> {
	if value.chars().count() > max {
		return Err(SemanticSearchError::validation(format!(
			"{field} must be at most {max} characters."
		)));
	}

	Ok(())
}

/// Returns the lowercase language name when supported.
pub fn require_language(language: &str) -> Result<String> {
	let normalized = language.trim().to_ascii_lowercase();

	if !SUPPORTED_LANGUAGES.contains(&normalized.as_str()) {
		return Err(SemanticSearchError::validation(format!(
			"Unsupported language {language:?}. Expected one of {}.",
			SUPPORTED_LANGUAGES.join(", ")
		)));
	}

	Ok(normalized)
}
