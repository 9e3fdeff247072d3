use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub api: Api,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub suggestions: Suggestions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Api {
	pub base_url: String,
	/// Sent as a bearer token when present.
	pub api_key: Option<String>,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Runtime knobs of the search layer. Every request reads them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Search {
	#[serde(default = "default_collection")]
	pub default_collection: String,
	#[serde(default = "default_model_id")]
	pub default_model_id: String,
	#[serde(default = "default_true")]
	pub enable_vector_fallback: bool,
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	#[serde(default = "default_retry_delay_ms")]
	pub retry_delay_ms: u64,
}
impl Default for Search {
	fn default() -> Self {
		Self {
			default_collection: default_collection(),
			default_model_id: default_model_id(),
			enable_vector_fallback: true,
			max_retries: default_max_retries(),
			retry_delay_ms: default_retry_delay_ms(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Suggestions {
	#[serde(default = "default_suggestion_limit")]
	pub default_limit: u32,
	#[serde(default = "default_min_query_length")]
	pub min_query_length: usize,
}
impl Default for Suggestions {
	fn default() -> Self {
		Self {
			default_limit: default_suggestion_limit(),
			min_query_length: default_min_query_length(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	10_000
}

fn default_collection() -> String {
	"knowledge_base".to_string()
}

fn default_model_id() -> String {
	"BAAI/bge-small-en-v1.5".to_string()
}

fn default_true() -> bool {
	true
}

fn default_max_retries() -> u32 {
	3
}

fn default_retry_delay_ms() -> u64 {
	1_000
}

fn default_suggestion_limit() -> u32 {
	5
}

fn default_min_query_length() -> usize {
	2
}
