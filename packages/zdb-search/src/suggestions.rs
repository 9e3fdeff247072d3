use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
	ErrorCode, Result, SEARCH_TEXT_PATH, SUGGESTIONS_PATH, SearchSettings, SemanticSearchError,
	SemanticSearchService, SuggestionOptions, normalize, validate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
	pub text: String,
	pub relevance_score: f64,
	pub category: String,
	pub result_count: u64,
}

/// Which tier produced a suggestion list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionSource {
	/// The query was too short; nothing was requested.
	Skipped,
	Primary,
	/// The suggestion index was unavailable and results came from vector search.
	VectorFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionsResponse {
	pub suggestions: Vec<Suggestion>,
	pub total_suggestions: u64,
	pub source: SuggestionSource,
}
impl SuggestionsResponse {
	pub fn empty() -> Self {
		Self { suggestions: Vec::new(), total_suggestions: 0, source: SuggestionSource::Skipped }
	}

	/// Degraded answers come from the fallback tier.
	pub fn is_degraded(&self) -> bool {
		self.source == SuggestionSource::VectorFallback
	}
}

impl SemanticSearchService {
	pub async fn get_suggestions(
		&self,
		query: &str,
		options: SuggestionOptions,
	) -> Result<SuggestionsResponse> {
		if validate::is_short_query(query, options.min_query_length) {
			return Ok(SuggestionsResponse::empty());
		}

		let query = query.trim();
		let limit = normalize::clamp_limit(options.limit);
		let params =
			[("q".to_string(), query.to_string()), ("limit".to_string(), limit.to_string())];
		let primary = self.get_with_retry("get_suggestions", SUGGESTIONS_PATH, &params).await;
		let primary_err = match primary {
			Ok(res) => {
				let suggestions = normalize::suggestions(&res.data);
				let total = res
					.data
					.get("total_suggestions")
					.and_then(Value::as_u64)
					.unwrap_or(suggestions.len() as u64);

				return Ok(SuggestionsResponse {
					suggestions,
					total_suggestions: total,
					source: SuggestionSource::Primary,
				});
			},
			Err(err) => err,
		};
		let settings = self.settings();

		if !settings.enable_vector_fallback {
			tracing::error!(
				code = %primary_err.code,
				status = ?primary_err.status_code,
				error = %primary_err,
				"Suggestion endpoint failed and vector fallback is disabled."
			);

			return Err(unavailable(
				"Suggestions are unavailable and vector fallback is disabled.",
				primary_err,
			));
		}

		tracing::warn!(
			code = %primary_err.code,
			error = %primary_err,
			collection = %settings.default_collection,
			"Suggestion endpoint failed, falling back to vector search."
		);

		match self.fallback_suggestions(settings, query, limit).await {
			Ok(suggestions) => Ok(SuggestionsResponse {
				total_suggestions: suggestions.len() as u64,
				suggestions,
				source: SuggestionSource::VectorFallback,
			}),
			Err(fallback_err) => {
				tracing::error!(
					primary = %primary_err,
					fallback = %fallback_err,
					"Suggestion fallback failed."
				);

				Err(unavailable(
					"Suggestions are unavailable and vector fallback failed.",
					fallback_err,
				))
			},
		}
	}

	/// One vector search against the default collection. Not retried.
	async fn fallback_suggestions(
		&self,
		settings: &SearchSettings,
		query: &str,
		limit: u32,
	) -> Result<Vec<Suggestion>> {
		let body = serde_json::json!({
			"query": query,
			"collection": settings.default_collection,
			"top_k": limit,
		});
		let res = self
			.client
			.post(SEARCH_TEXT_PATH, &body)
			.await
			.map_err(|err| SemanticSearchError::from_client("Vector fallback failed", err))?;

		Ok(normalize::search_response(&res.data)
			.results
			.iter()
			.filter_map(normalize::suggestion_from_result)
			.collect())
	}
}

/// Keeps the underlying cause but replaces the code.
fn unavailable(message: &str, err: SemanticSearchError) -> SemanticSearchError {
	SemanticSearchError {
		message: format!("{message} Last error: {}", err.message),
		code: ErrorCode::ServiceUnavailable,
		status_code: err.status_code,
		cause: err.cause,
	}
}
