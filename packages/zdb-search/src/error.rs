use serde::{Deserialize, Serialize};

pub type Result<T, E = SemanticSearchError> = std::result::Result<T, E>;

/// Stable failure codes exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
	InvalidQuery,
	Unauthorized,
	NotFound,
	RateLimited,
	Timeout,
	ApiError,
	Unknown,
	ValidationError,
	ServiceUnavailable,
}
impl ErrorCode {
	pub fn from_status(status: u16) -> Self {
		match status {
			400 | 422 => Self::InvalidQuery,
			401 | 403 => Self::Unauthorized,
			404 => Self::NotFound,
			408 | 504 => Self::Timeout,
			429 => Self::RateLimited,
			500..=599 => Self::ApiError,
			_ => Self::Unknown,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::InvalidQuery => "INVALID_QUERY",
			Self::Unauthorized => "UNAUTHORIZED",
			Self::NotFound => "NOT_FOUND",
			Self::RateLimited => "RATE_LIMITED",
			Self::Timeout => "TIMEOUT",
			Self::ApiError => "API_ERROR",
			Self::Unknown => "UNKNOWN",
			Self::ValidationError => "VALIDATION_ERROR",
			Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
		}
	}

	/// Codes worth another attempt against the same endpoint.
	pub fn is_transient(self) -> bool {
		matches!(self, Self::Timeout | Self::ApiError | Self::RateLimited)
	}
}

impl std::fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SemanticSearchError {
	pub message: String,
	pub code: ErrorCode,
	pub status_code: Option<u16>,
	#[source]
	pub cause: Option<zdb_client::Error>,
}
impl SemanticSearchError {
	pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
		Self { message: message.into(), code, status_code: None, cause: None }
	}

	pub fn validation(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::ValidationError, message)
	}

	pub fn invalid_response(message: impl Into<String>) -> Self {
		Self::new(ErrorCode::Unknown, message)
	}

	/// Wraps a transport failure, keeping it as the source.
	pub fn from_client(context: &str, err: zdb_client::Error) -> Self {
		Self {
			message: format!("{context}: {err}"),
			code: classify(&err),
			status_code: err.status(),
			cause: Some(err),
		}
	}

	pub fn is_retryable(&self) -> bool {
		match &self.cause {
			Some(cause) => is_retryable(cause),
			None => false,
		}
	}
}

pub fn classify(err: &zdb_client::Error) -> ErrorCode {
	if err.is_timeout() {
		return ErrorCode::Timeout;
	}

	match err.status() {
		Some(status) => ErrorCode::from_status(status),
		None => ErrorCode::Unknown,
	}
}

/// Retry eligibility. Connection failures have no status but are still transient.
pub fn is_retryable(err: &zdb_client::Error) -> bool {
	err.is_transport() || classify(err).is_transient()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn status_error(status: u16) -> zdb_client::Error {
		zdb_client::Error::Status {
			path: "/v1/test".to_string(),
			status,
			message: "boom".to_string(),
		}
	}

	#[test]
	fn maps_statuses_to_codes() {
		let cases = [
			(400, ErrorCode::InvalidQuery),
			(401, ErrorCode::Unauthorized),
			(403, ErrorCode::Unauthorized),
			(404, ErrorCode::NotFound),
			(408, ErrorCode::Timeout),
			(429, ErrorCode::RateLimited),
			(500, ErrorCode::ApiError),
			(503, ErrorCode::ApiError),
			(504, ErrorCode::Timeout),
			(302, ErrorCode::Unknown),
			(418, ErrorCode::Unknown),
		];

		for (status, expected) in cases {
			assert_eq!(ErrorCode::from_status(status), expected, "status {status}");
		}
	}

	#[test]
	fn statusless_errors_are_unknown() {
		let err = zdb_client::Error::InvalidConfig { message: "bad".to_string() };

		assert_eq!(classify(&err), ErrorCode::Unknown);
		assert!(!is_retryable(&err));
	}

	#[test]
	fn timeouts_are_classified_and_retried() {
		let err = zdb_client::Error::Timeout { path: "/v1/test".to_string() };

		assert_eq!(classify(&err), ErrorCode::Timeout);
		assert!(is_retryable(&err));
	}

	#[test]
	fn client_errors_are_not_retried() {
		assert!(!is_retryable(&status_error(400)));
		assert!(!is_retryable(&status_error(401)));
		assert!(!is_retryable(&status_error(404)));
		assert!(is_retryable(&status_error(429)));
		assert!(is_retryable(&status_error(502)));
	}

	#[test]
	fn wrapped_error_keeps_status_and_source() {
		let err = SemanticSearchError::from_client("Search failed", status_error(503));

		assert_eq!(err.code, ErrorCode::ApiError);
		assert_eq!(err.status_code, Some(503));
		assert!(err.message.starts_with("Search failed: "));
		assert!(std::error::Error::source(&err).is_some());
		assert!(err.is_retryable());
	}

	#[test]
	fn codes_serialize_screaming_snake_case() {
		let json = serde_json::to_value(ErrorCode::ServiceUnavailable).expect("serialize failed");

		assert_eq!(json, "SERVICE_UNAVAILABLE");
		assert_eq!(ErrorCode::ValidationError.to_string(), "VALIDATION_ERROR");
	}
}
