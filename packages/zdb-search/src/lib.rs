pub mod analysis;
pub mod embedding;
pub mod error;
pub mod health;
pub mod normalize;
pub mod retry;
pub mod search;
pub mod settings;
pub mod suggestions;
pub mod validate;

pub use analysis::{CodeAnalysis, CodeAnalysisRequest, CodeIssue};
pub use embedding::{Embedding, IndexContentRequest, IndexResult};
pub use error::{ErrorCode, Result, SemanticSearchError};
pub use health::HealthStatus;
pub use retry::RetryPolicy;
pub use search::{RelatedContentRequest, SearchContentRequest, SearchResponse, SearchResult};
pub use settings::{SearchSettings, SearchSettingsUpdate, SuggestionOptions};
pub use suggestions::{Suggestion, SuggestionSource, SuggestionsResponse};

use std::sync::Arc;

use serde_json::Value;

use zdb_client::{ApiClient, ApiResponse, HttpApiClient, Query};
use zdb_config::Config;

pub const SUGGESTIONS_PATH: &str = "/v1/public/zerodb/search/suggestions";
pub const SEARCH_TEXT_PATH: &str = "/v1/public/zerodb/vectors/search/text";
pub const SEARCH_RELATED_PATH: &str = "/v1/public/zerodb/vectors/search/related";
pub const INDEX_PATH: &str = "/v1/public/zerodb/vectors/index";
pub const HEALTH_PATH: &str = "/v1/public/zerodb/health";
pub const CODE_ANALYSIS_PATH: &str = "/v1/public/qnn/code/analyze";

/// Client for the backend's semantic search and analysis endpoints.
///
/// Each call is an independent pipeline: validate, call with retry, normalize.
/// The only state is the instance's [`SearchSettings`].
pub struct SemanticSearchService {
	client: Arc<dyn ApiClient>,
	settings: SearchSettings,
}
impl SemanticSearchService {
	pub fn new(client: Arc<dyn ApiClient>, settings: SearchSettings) -> Self {
		Self { client, settings }
	}

	pub fn from_config(cfg: &Config) -> Result<Self> {
		let client = HttpApiClient::new(&cfg.api)
			.map_err(|err| SemanticSearchError::from_client("Failed to build API client", err))?;

		Ok(Self::new(Arc::new(client), cfg.search.clone().into()))
	}

	pub fn settings(&self) -> &SearchSettings {
		&self.settings
	}

	/// Merges `update` into the current settings and returns the result.
	pub fn configure(&mut self, update: &SearchSettingsUpdate) -> &SearchSettings {
		self.settings = self.settings.merge(update);

		tracing::debug!(settings = ?self.settings, "Search settings updated.");

		&self.settings
	}

	/// Failures are classified but not logged; the caller knows whether they are final.
	pub(crate) async fn get_with_retry(
		&self,
		operation: &str,
		path: &str,
		query: &Query,
	) -> Result<ApiResponse> {
		let result = retry::run(
			self.settings.retry_policy(),
			operation,
			|| self.client.get(path, query),
			error::is_retryable,
		)
		.await;

		result.map_err(|err| SemanticSearchError::from_client(&format!("{operation} failed"), err))
	}

	pub(crate) async fn post_with_retry(
		&self,
		operation: &str,
		path: &str,
		body: &Value,
	) -> Result<ApiResponse> {
		let result = retry::run(
			self.settings.retry_policy(),
			operation,
			|| self.client.post(path, body),
			error::is_retryable,
		)
		.await;

		result.map_err(|err| failure(operation, err))
	}
}

fn failure(operation: &str, err: zdb_client::Error) -> SemanticSearchError {
	let err = SemanticSearchError::from_client(&format!("{operation} failed"), err);

	tracing::error!(
		op = operation,
		code = %err.code,
		status = ?err.status_code,
		error = %err,
		"Remote call failed."
	);

	err
}
