use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{INDEX_PATH, Result, SemanticSearchError, SemanticSearchService, validate};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
	pub vector: Vec<f32>,
	pub model_id: String,
	pub dimensions: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexContentRequest {
	/// Generated when absent.
	#[serde(default)]
	pub id: Option<String>,
	pub text: String,
	#[serde(default)]
	pub metadata: Map<String, Value>,
	#[serde(default)]
	pub collection: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexResult {
	pub id: String,
	pub indexed: bool,
}

impl SemanticSearchService {
	pub async fn generate_embedding(&self, text: &str, model_id: Option<&str>) -> Result<Embedding> {
		let text = validate::require_text("text", text)?;
		let model_id = model_id
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.unwrap_or(self.settings().default_model_id.as_str())
			.to_string();
		let path = embed_path(&model_id);
		let body = serde_json::json!({ "text": text });
		let res = self.post_with_retry("generate_embedding", &path, &body).await?;
		let vector = crate::normalize::embedding_vector(&res.data).ok_or_else(|| {
			SemanticSearchError::invalid_response(
				"Embedding response is missing a numeric embedding array.",
			)
		})?;

		Ok(Embedding { dimensions: vector.len(), vector, model_id })
	}

	pub async fn index_content(&self, req: &IndexContentRequest) -> Result<IndexResult> {
		let text = validate::require_text("text", &req.text)?;
		let id = req
			.id
			.as_deref()
			.map(str::trim)
			.filter(|id| !id.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| Uuid::new_v4().to_string());
		let body = serde_json::json!({
			"id": id,
			"text": text,
			"metadata": req.metadata,
			"collection": self.collection_or_default(req.collection.as_deref()),
		});
		let res = self.post_with_retry("index_content", INDEX_PATH, &body).await?;
		let id = res.data.get("id").and_then(Value::as_str).map(str::to_string).unwrap_or(id);
		let indexed = res
			.data
			.get("indexed")
			.or_else(|| res.data.get("success"))
			.and_then(Value::as_bool)
			.unwrap_or(true);

		tracing::debug!(%id, indexed, "Content indexed.");

		Ok(IndexResult { id, indexed })
	}
}

pub fn embed_path(model_id: &str) -> String {
	format!("/v1/public/zeroml/models/{}/embed", urlencoding::encode(model_id))
}
