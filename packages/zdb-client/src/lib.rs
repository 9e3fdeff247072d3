mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, time::Duration};

use reqwest::{
	Client, RequestBuilder, StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

use zdb_config::Api;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub type Query = [(String, String)];

/// A decoded backend response. `data` is `Value::Null` for an empty body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
	pub data: Value,
	pub status: u16,
	pub status_text: String,
}

pub trait ApiClient
where
	Self: Send + Sync,
{
	fn get<'a>(&'a self, path: &'a str, query: &'a Query) -> BoxFuture<'a, Result<ApiResponse>>;

	fn post<'a>(&'a self, path: &'a str, body: &'a Value) -> BoxFuture<'a, Result<ApiResponse>>;
}

pub struct HttpApiClient {
	client: Client,
	base_url: String,
}
impl HttpApiClient {
	pub fn new(cfg: &Api) -> Result<Self> {
		if cfg.base_url.trim().is_empty() {
			return Err(Error::InvalidConfig { message: "API base URL must be non-empty.".to_string() });
		}

		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(auth_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
			.build()?;

		Ok(Self { client, base_url: cfg.base_url.trim_end_matches('/').to_string() })
	}

	fn url(&self, path: &str) -> String {
		if path.starts_with('/') {
			format!("{}{path}", self.base_url)
		} else {
			format!("{}/{path}", self.base_url)
		}
	}

	async fn send(&self, path: &str, request: RequestBuilder) -> Result<ApiResponse> {
		let res = request.send().await.map_err(|err| {
			if err.is_timeout() {
				Error::Timeout { path: path.to_string() }
			} else {
				Error::Reqwest(err)
			}
		})?;
		let status = res.status();
		let raw = res.text().await.map_err(|err| {
			if err.is_timeout() {
				Error::Timeout { path: path.to_string() }
			} else {
				Error::Reqwest(err)
			}
		})?;

		if !status.is_success() {
			let message = error_message(status, &raw);

			tracing::debug!(%path, status = status.as_u16(), %message, "Backend returned an error status.");

			return Err(Error::Status { path: path.to_string(), status: status.as_u16(), message });
		}

		let data = if raw.trim().is_empty() { Value::Null } else { serde_json::from_str(&raw)? };

		Ok(ApiResponse {
			data,
			status: status.as_u16(),
			status_text: status.canonical_reason().unwrap_or_default().to_string(),
		})
	}
}

impl ApiClient for HttpApiClient {
	fn get<'a>(&'a self, path: &'a str, query: &'a Query) -> BoxFuture<'a, Result<ApiResponse>> {
		Box::pin(async move {
			tracing::debug!(%path, "Issuing GET request.");

			self.send(path, self.client.get(self.url(path)).query(query)).await
		})
	}

	fn post<'a>(&'a self, path: &'a str, body: &'a Value) -> BoxFuture<'a, Result<ApiResponse>> {
		Box::pin(async move {
			tracing::debug!(%path, "Issuing POST request.");

			self.send(path, self.client.post(self.url(path)).json(body)).await
		})
	}
}

pub fn auth_headers(api_key: Option<&str>, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);
	}

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

fn error_message(status: StatusCode, raw: &str) -> String {
	let from_body = serde_json::from_str::<Value>(raw).ok().and_then(|json| {
		["detail", "message", "error"]
			.into_iter()
			.find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
	});

	from_body.unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown status").to_string())
}
