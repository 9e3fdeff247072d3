//! Coerces loosely typed backend payloads into fixed shapes.
//!
//! Absent or mistyped fields take a type-appropriate default, so nothing past
//! this module deals with optional JSON.

use serde_json::{Map, Value};

use crate::{
	analysis::{CodeAnalysis, CodeIssue},
	search::{SearchResponse, SearchResult},
	suggestions::Suggestion,
};

pub const MIN_TOP_K: i64 = 1;
pub const MAX_TOP_K: i64 = 100;
pub const DEFAULT_CATEGORY: &str = "general";

pub fn clamp_top_k(top_k: i64) -> u32 {
	top_k.clamp(MIN_TOP_K, MAX_TOP_K) as u32
}

pub fn clamp_limit(limit: u32) -> u32 {
	limit.clamp(MIN_TOP_K as u32, MAX_TOP_K as u32)
}

pub fn clamp_unit(value: f64) -> f64 {
	if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

pub fn suggestion(value: &Value) -> Suggestion {
	Suggestion {
		text: string_field(value, &["text", "suggestion"]).unwrap_or_default(),
		relevance_score: clamp_unit(
			number_field(value, &["relevance_score", "relevanceScore", "score"]).unwrap_or(0.0),
		),
		category: string_field(value, &["category"])
			.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
		result_count: count_field(value, &["result_count", "resultCount"]).unwrap_or(0),
	}
}

pub fn suggestions(data: &Value) -> Vec<Suggestion> {
	array_field(data, &["suggestions", "data"]).iter().map(suggestion).collect()
}

/// Turns a vector hit into a suggestion. Hits without a string `metadata.title`
/// cannot be shown and yield `None`.
pub fn suggestion_from_result(result: &SearchResult) -> Option<Suggestion> {
	let title = result.metadata.get("title").and_then(Value::as_str)?.trim();

	if title.is_empty() {
		return None;
	}

	let category = result
		.metadata
		.get("category")
		.and_then(Value::as_str)
		.filter(|category| !category.trim().is_empty())
		.unwrap_or(DEFAULT_CATEGORY);

	Some(Suggestion {
		text: title.to_string(),
		relevance_score: clamp_unit(result.score),
		category: category.to_string(),
		result_count: 1,
	})
}

pub fn search_result(value: &Value) -> SearchResult {
	let id = match value.get("id").or_else(|| value.get("vector_id")) {
		Some(Value::String(id)) => id.clone(),
		Some(Value::Number(id)) => id.to_string(),
		_ => String::new(),
	};
	let metadata = value
		.get("metadata")
		.and_then(Value::as_object)
		.cloned()
		.unwrap_or_else(Map::new);

	SearchResult {
		id,
		score: number_field(value, &["score", "similarity"]).unwrap_or(0.0),
		metadata,
	}
}

pub fn search_response(data: &Value) -> SearchResponse {
	let results: Vec<SearchResult> =
		array_field(data, &["results", "data"]).iter().map(search_result).collect();
	let total = count_field(data, &["total", "total_results"]).unwrap_or(results.len() as u64);

	SearchResponse { results, total }
}

/// Accepts `{embedding: [..]}`, `{embeddings: [[..]]}` and `{data: [{embedding: [..]}]}`.
pub fn embedding_vector(data: &Value) -> Option<Vec<f32>> {
	let raw = data
		.get("embedding")
		.or_else(|| data.get("embeddings").and_then(|v| v.get(0)))
		.or_else(|| data.get("data").and_then(|v| v.get(0)).and_then(|v| v.get("embedding")))
		.and_then(Value::as_array)
		.filter(|raw| !raw.is_empty())?;
	let mut vector = Vec::with_capacity(raw.len());

	for value in raw {
		vector.push(value.as_f64()? as f32);
	}

	Some(vector)
}

pub fn code_analysis(data: &Value, language: &str) -> CodeAnalysis {
	let issues = array_field(data, &["issues"])
		.iter()
		.map(|issue| CodeIssue {
			severity: string_field(issue, &["severity"]).unwrap_or_else(|| "info".to_string()),
			message: string_field(issue, &["message"]).unwrap_or_default(),
			line: count_field(issue, &["line"]).map(|line| line.min(u32::MAX as u64) as u32),
		})
		.collect();
	let suggestions = array_field(data, &["suggestions"])
		.iter()
		.filter_map(Value::as_str)
		.map(str::to_string)
		.collect();

	CodeAnalysis {
		language: string_field(data, &["language"]).unwrap_or_else(|| language.to_string()),
		complexity: number_field(data, &["complexity", "complexity_score"])
			.map(|value| value.max(0.0))
			.unwrap_or(0.0),
		issues,
		suggestions,
		summary: string_field(data, &["summary"]).unwrap_or_default(),
	}
}

fn string_field(value: &Value, keys: &[&str]) -> Option<String> {
	keys.iter().find_map(|key| value.get(*key).and_then(Value::as_str)).map(str::to_string)
}

fn number_field(value: &Value, keys: &[&str]) -> Option<f64> {
	keys.iter()
		.find_map(|key| value.get(*key).and_then(Value::as_f64))
		.filter(|number| number.is_finite())
}

fn count_field(value: &Value, keys: &[&str]) -> Option<u64> {
	keys.iter().find_map(|key| {
		let field = value.get(*key)?;

		field
			.as_u64()
			.or_else(|| field.as_f64().filter(|n| n.is_finite() && *n >= 0.0).map(|n| n as u64))
	})
}

fn array_field<'a>(value: &'a Value, keys: &[&str]) -> &'a [Value] {
	if let Some(items) = value.as_array() {
		return items;
	}

	keys.iter()
		.find_map(|key| value.get(*key).and_then(Value::as_array))
		.map(Vec::as_slice)
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamps_top_k_into_range() {
		assert_eq!(clamp_top_k(500), 100);
		assert_eq!(clamp_top_k(0), 1);
		assert_eq!(clamp_top_k(-7), 1);
		assert_eq!(clamp_top_k(42), 42);
	}

	#[test]
	fn suggestion_defaults_missing_and_mistyped_fields() {
		let parsed = suggestion(&serde_json::json!({
			"text": 17,
			"relevance_score": "high",
			"result_count": -3
		}));

		assert_eq!(parsed.text, "");
		assert_eq!(parsed.relevance_score, 0.0);
		assert_eq!(parsed.category, "general");
		assert_eq!(parsed.result_count, 0);
	}

	#[test]
	fn suggestion_reads_present_fields() {
		let parsed = suggestion(&serde_json::json!({
			"text": "vector search",
			"relevance_score": 1.7,
			"category": "docs",
			"result_count": 12
		}));

		assert_eq!(parsed.text, "vector search");
		assert_eq!(parsed.relevance_score, 1.0);
		assert_eq!(parsed.category, "docs");
		assert_eq!(parsed.result_count, 12);
	}

	#[test]
	fn search_results_fall_back_to_data_array() {
		let response = search_response(&serde_json::json!({
			"data": [
				{ "id": 7, "score": 0.5, "metadata": { "title": "A" } },
				{ "metadata": "nope" }
			]
		}));

		assert_eq!(response.total, 2);
		assert_eq!(response.results[0].id, "7");
		assert_eq!(response.results[1].id, "");
		assert_eq!(response.results[1].score, 0.0);
		assert!(response.results[1].metadata.is_empty());
	}

	#[test]
	fn non_object_payload_yields_empty_results() {
		assert!(search_response(&Value::Null).results.is_empty());
		assert!(suggestions(&serde_json::json!("oops")).is_empty());
	}

	#[test]
	fn result_without_title_is_not_a_suggestion() {
		let hit = search_result(&serde_json::json!({ "id": "a", "score": 0.4, "metadata": {} }));

		assert!(suggestion_from_result(&hit).is_none());

		let hit = search_result(&serde_json::json!({
			"id": "b",
			"score": 0.9,
			"metadata": { "title": "Agent memory", "category": "blog" }
		}));
		let parsed = suggestion_from_result(&hit).expect("Expected a suggestion.");

		assert_eq!(parsed.text, "Agent memory");
		assert_eq!(parsed.category, "blog");
		assert_eq!(parsed.result_count, 1);
	}

	#[test]
	fn embedding_shapes_are_accepted() {
		let direct = serde_json::json!({ "embedding": [0.5, 1.0] });
		let batched = serde_json::json!({ "embeddings": [[0.25]] });
		let openai = serde_json::json!({ "data": [{ "embedding": [2.0] }] });

		assert_eq!(embedding_vector(&direct), Some(vec![0.5, 1.0]));
		assert_eq!(embedding_vector(&batched), Some(vec![0.25]));
		assert_eq!(embedding_vector(&openai), Some(vec![2.0]));
		assert_eq!(embedding_vector(&serde_json::json!({ "embedding": ["x"] })), None);
		assert_eq!(embedding_vector(&serde_json::json!({ "embedding": [] })), None);
	}
}
