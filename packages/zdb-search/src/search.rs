use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
	Result, SEARCH_RELATED_PATH, SEARCH_TEXT_PATH, SemanticSearchService, normalize, validate,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
	pub id: String,
	pub score: f64,
	pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
	pub results: Vec<SearchResult>,
	pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchContentRequest {
	pub query: String,
	/// Defaults to the configured collection.
	#[serde(default)]
	pub collection: Option<String>,
	#[serde(default = "default_top_k")]
	pub top_k: i64,
	#[serde(default)]
	pub min_score: Option<f64>,
	#[serde(default)]
	pub filters: Option<Map<String, Value>>,
}
impl SearchContentRequest {
	pub fn new(query: impl Into<String>) -> Self {
		Self {
			query: query.into(),
			collection: None,
			top_k: default_top_k(),
			min_score: None,
			filters: None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedContentRequest {
	pub text: String,
	#[serde(default)]
	pub collection: Option<String>,
	#[serde(default = "default_top_k")]
	pub top_k: i64,
	/// Usually the id of the document `text` came from.
	#[serde(default)]
	pub exclude_id: Option<String>,
}
impl RelatedContentRequest {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into(), collection: None, top_k: default_top_k(), exclude_id: None }
	}
}

impl SemanticSearchService {
	pub async fn search_content(&self, req: &SearchContentRequest) -> Result<SearchResponse> {
		let query = validate::require_text("query", &req.query)?;
		let mut body = serde_json::json!({
			"query": query,
			"collection": self.collection_or_default(req.collection.as_deref()),
			"top_k": normalize::clamp_top_k(req.top_k),
		});

		if let Some(min_score) = req.min_score {
			body["min_score"] = Value::from(normalize::clamp_unit(min_score));
		}
		if let Some(filters) = req.filters.as_ref().filter(|filters| !filters.is_empty()) {
			body["filters"] = Value::Object(filters.clone());
		}

		let res = self.post_with_retry("search_content", SEARCH_TEXT_PATH, &body).await?;

		Ok(normalize::search_response(&res.data))
	}

	pub async fn search_related(&self, req: &RelatedContentRequest) -> Result<SearchResponse> {
		let text = validate::require_text("text", &req.text)?;
		let exclude_id = req.exclude_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
		let mut body = serde_json::json!({
			"text": text,
			"collection": self.collection_or_default(req.collection.as_deref()),
			"top_k": normalize::clamp_top_k(req.top_k),
		});

		if let Some(exclude_id) = exclude_id {
			body["exclude_id"] = Value::from(exclude_id);
		}

		let res = self.post_with_retry("search_related", SEARCH_RELATED_PATH, &body).await?;
		let mut response = normalize::search_response(&res.data);

		// The backend may still return the source document itself.
		if let Some(exclude_id) = exclude_id {
			let before = response.results.len();

			response.results.retain(|result| result.id != exclude_id);

			let removed = (before - response.results.len()) as u64;

			response.total = response.total.saturating_sub(removed);
		}

		Ok(response)
	}

	pub(crate) fn collection_or_default(&self, collection: Option<&str>) -> String {
		collection
			.map(str::trim)
			.filter(|collection| !collection.is_empty())
			.unwrap_or(self.settings().default_collection.as_str())
			.to_string()
	}
}

fn default_top_k() -> i64 {
	10
}
