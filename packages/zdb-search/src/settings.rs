use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Per-service configuration. Owned by a [`crate::SemanticSearchService`] instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
	pub default_collection: String,
	pub default_model_id: String,
	pub enable_vector_fallback: bool,
	pub max_retries: u32,
	pub retry_delay_ms: u64,
}
impl SearchSettings {
	/// Returns a copy with every field present in `update` replaced.
	pub fn merge(&self, update: &SearchSettingsUpdate) -> Self {
		Self {
			default_collection: update
				.default_collection
				.clone()
				.unwrap_or_else(|| self.default_collection.clone()),
			default_model_id: update
				.default_model_id
				.clone()
				.unwrap_or_else(|| self.default_model_id.clone()),
			enable_vector_fallback: update
				.enable_vector_fallback
				.unwrap_or(self.enable_vector_fallback),
			max_retries: update.max_retries.unwrap_or(self.max_retries),
			retry_delay_ms: update.retry_delay_ms.unwrap_or(self.retry_delay_ms),
		}
	}

	pub fn retry_policy(&self) -> RetryPolicy {
		RetryPolicy { max_retries: self.max_retries, retry_delay_ms: self.retry_delay_ms }
	}
}

impl Default for SearchSettings {
	fn default() -> Self {
		zdb_config::Search::default().into()
	}
}

impl From<zdb_config::Search> for SearchSettings {
	fn from(cfg: zdb_config::Search) -> Self {
		Self {
			default_collection: cfg.default_collection,
			default_model_id: cfg.default_model_id,
			enable_vector_fallback: cfg.enable_vector_fallback,
			max_retries: cfg.max_retries,
			retry_delay_ms: cfg.retry_delay_ms,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettingsUpdate {
	#[serde(default)]
	pub default_collection: Option<String>,
	#[serde(default)]
	pub default_model_id: Option<String>,
	#[serde(default)]
	pub enable_vector_fallback: Option<bool>,
	#[serde(default)]
	pub max_retries: Option<u32>,
	#[serde(default)]
	pub retry_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionOptions {
	pub limit: u32,
	pub min_query_length: usize,
}
impl Default for SuggestionOptions {
	fn default() -> Self {
		(&zdb_config::Suggestions::default()).into()
	}
}

impl From<&zdb_config::Suggestions> for SuggestionOptions {
	fn from(cfg: &zdb_config::Suggestions) -> Self {
		Self { limit: cfg.default_limit, min_query_length: cfg.min_query_length }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_only_replaces_present_fields() {
		let base = SearchSettings::default();
		let update = SearchSettingsUpdate {
			enable_vector_fallback: Some(false),
			max_retries: Some(0),
			..Default::default()
		};
		let merged = base.merge(&update);

		assert!(!merged.enable_vector_fallback);
		assert_eq!(merged.max_retries, 0);
		assert_eq!(merged.default_collection, base.default_collection);
		assert_eq!(merged.default_model_id, base.default_model_id);
		assert_eq!(merged.retry_delay_ms, base.retry_delay_ms);
	}

	#[test]
	fn empty_update_is_identity() {
		let base = SearchSettings::default();

		assert_eq!(base.merge(&SearchSettingsUpdate::default()), base);
	}
}
