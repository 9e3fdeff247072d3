mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Api, Config, Search, Service, Suggestions};

use std::{fs, path::Path};

pub const MAX_RETRIES_LIMIT: u32 = 10;
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;
pub const MAX_SUGGESTION_LIMIT: u32 = 100;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	let base_url = cfg.api.base_url.trim();

	if base_url.is_empty() {
		return Err(Error::Validation { message: "api.base_url must be non-empty.".to_string() });
	}
	if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
		return Err(Error::Validation {
			message: "api.base_url must start with http:// or https://.".to_string(),
		});
	}
	if cfg.api.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "api.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.api.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("api.default_headers.{key} must be a string."),
			});
		}
	}

	for (label, value) in [
		("search.default_collection", &cfg.search.default_collection),
		("search.default_model_id", &cfg.search.default_model_id),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.search.max_retries > MAX_RETRIES_LIMIT {
		return Err(Error::Validation {
			message: format!("search.max_retries must be {MAX_RETRIES_LIMIT} or less."),
		});
	}
	if cfg.search.retry_delay_ms > MAX_RETRY_DELAY_MS {
		return Err(Error::Validation {
			message: format!("search.retry_delay_ms must be {MAX_RETRY_DELAY_MS} or less."),
		});
	}
	if !(1..=MAX_SUGGESTION_LIMIT).contains(&cfg.suggestions.default_limit) {
		return Err(Error::Validation {
			message: format!(
				"suggestions.default_limit must be in the range 1-{MAX_SUGGESTION_LIMIT}."
			),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.api.base_url.trim().trim_end_matches('/').to_string();

	cfg.api.base_url = trimmed;

	if cfg.api.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.api.api_key = None;
	}
}
