use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{HEALTH_PATH, SemanticSearchError, SemanticSearchService};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
	pub healthy: bool,
	pub status: String,
	pub message: Option<String>,
}

impl SemanticSearchService {
	/// Never fails: an unreachable backend is reported as unhealthy. A 2xx reply is healthy
	/// unless its `status` says otherwise.
	pub async fn health_check(&self) -> HealthStatus {
		match self.client.get(HEALTH_PATH, &[]).await {
			Ok(res) => {
				let status = res
					.data
					.get("status")
					.and_then(Value::as_str)
					.map(str::to_ascii_lowercase)
					.unwrap_or_else(|| "ok".to_string());
				let healthy = !matches!(
					status.as_str(),
					"down" | "error" | "fail" | "failed" | "unhealthy" | "unavailable"
				);
				let message = res.data.get("message").and_then(Value::as_str).map(str::to_string);

				HealthStatus { healthy, status, message }
			},
			Err(err) => {
				let err = SemanticSearchError::from_client("Health check failed", err);

				tracing::warn!(code = %err.code, error = %err, "Backend health check failed.");

				HealthStatus {
					healthy: false,
					status: err.code.as_str().to_ascii_lowercase(),
					message: Some(err.message),
				}
			},
		}
	}
}
