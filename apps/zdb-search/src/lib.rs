use std::{fs, path::PathBuf};

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use color_eyre::{Result, eyre};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use zdb_search::{
	CodeAnalysisRequest, IndexContentRequest, RelatedContentRequest, SearchContentRequest,
	SemanticSearchService, SuggestionOptions,
};

#[derive(Debug, Parser)]
#[command(
	version,
	about,
	rename_all = "kebab",
	styles = styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Command {
	/// Autocomplete suggestions for a partial query.
	Suggest {
		query: String,
		#[arg(long)]
		limit: Option<u32>,
		#[arg(long)]
		min_length: Option<usize>,
	},
	/// Vector search by query text.
	Search {
		query: String,
		#[arg(long, default_value_t = 10, allow_negative_numbers = true)]
		top_k: i64,
		#[arg(long)]
		collection: Option<String>,
		#[arg(long)]
		min_score: Option<f64>,
	},
	/// Content related to a piece of text.
	Related {
		text: String,
		#[arg(long, default_value_t = 10, allow_negative_numbers = true)]
		top_k: i64,
		#[arg(long)]
		collection: Option<String>,
		#[arg(long)]
		exclude_id: Option<String>,
	},
	Embed {
		text: String,
		#[arg(long)]
		model: Option<String>,
	},
	Index {
		text: String,
		#[arg(long)]
		id: Option<String>,
		#[arg(long)]
		collection: Option<String>,
		/// JSON object stored alongside the vector.
		#[arg(long)]
		metadata: Option<String>,
	},
	Health,
	/// Static analysis of a source file.
	Analyze {
		file: PathBuf,
		/// Inferred from the file extension when omitted.
		#[arg(long)]
		language: Option<String>,
	},
}

pub async fn run(args: Args) -> Result<()> {
	let config = zdb_config::load(&args.config)?;

	init_tracing(&config);

	let service = SemanticSearchService::from_config(&config)?;
	let defaults = SuggestionOptions::from(&config.suggestions);

	tracing::debug!(command = ?args.command, "Running command.");

	let output = execute(&service, defaults, args.command).await?;

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// Runs one command and returns its result as JSON.
pub async fn execute(
	service: &SemanticSearchService,
	defaults: SuggestionOptions,
	command: Command,
) -> Result<Value> {
	match command {
		Command::Suggest { query, limit, min_length } => {
			let options = SuggestionOptions {
				limit: limit.unwrap_or(defaults.limit),
				min_query_length: min_length.unwrap_or(defaults.min_query_length),
			};

			to_json(service.get_suggestions(&query, options).await?)
		},
		Command::Search { query, top_k, collection, min_score } => {
			let req = SearchContentRequest { query, collection, top_k, min_score, filters: None };

			to_json(service.search_content(&req).await?)
		},
		Command::Related { text, top_k, collection, exclude_id } => {
			let req = RelatedContentRequest { text, collection, top_k, exclude_id };

			to_json(service.search_related(&req).await?)
		},
		Command::Embed { text, model } => {
			to_json(service.generate_embedding(&text, model.as_deref()).await?)
		},
		Command::Index { text, id, collection, metadata } => {
			let metadata = parse_metadata(metadata.as_deref())?;
			let req = IndexContentRequest { id, text, metadata, collection };

			to_json(service.index_content(&req).await?)
		},
		Command::Health => to_json(service.health_check().await),
		Command::Analyze { file, language } => {
			let code = fs::read_to_string(&file)
				.map_err(|err| eyre::eyre!("Failed to read {}: {err}.", file.display()))?;
			let language = match language {
				Some(language) => language,
				None => language_from_extension(&file).ok_or_else(|| {
					eyre::eyre!("Cannot infer language for {}. Pass --language.", file.display())
				})?,
			};

			to_json(service.analyze_code(&CodeAnalysisRequest { code, language }).await?)
		},
	}
}

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
		.literal(AnsiColor::Yellow.on_default())
		.placeholder(AnsiColor::Green.on_default())
		.error(AnsiColor::Red.on_default() | Effects::BOLD)
}

fn to_json<T>(value: T) -> Result<Value>
where
	T: Serialize,
{
	Ok(serde_json::to_value(value)?)
}

fn parse_metadata(raw: Option<&str>) -> Result<Map<String, Value>> {
	let Some(raw) = raw else {
		return Ok(Map::new());
	};

	match serde_json::from_str(raw)? {
		Value::Object(map) => Ok(map),
		_ => Err(eyre::eyre!("--metadata must be a JSON object.")),
	}
}

fn language_from_extension(path: &std::path::Path) -> Option<String> {
	let language = match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
		"py" => "python",
		"js" | "mjs" | "cjs" | "jsx" => "javascript",
		"ts" | "tsx" => "typescript",
		"rs" => "rust",
		"go" => "go",
		"java" => "java",
		"c" | "h" => "c",
		"cc" | "cpp" | "cxx" | "hpp" => "cpp",
		"cs" => "csharp",
		"rb" => "ruby",
		"php" => "php",
		_ => return None,
	};

	Some(language.to_string())
}

fn init_tracing(config: &zdb_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	// Logs go to stderr so stdout stays machine-readable.
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn infers_language_from_extension() {
		let infer = |path: &str| language_from_extension(std::path::Path::new(path));

		assert_eq!(infer("a/b.RS").as_deref(), Some("rust"));
		assert_eq!(infer("x.tsx").as_deref(), Some("typescript"));
		assert_eq!(infer("Makefile"), None);
	}

	#[test]
	fn metadata_must_be_an_object() {
		assert!(parse_metadata(None).expect("empty metadata").is_empty());
		assert_eq!(parse_metadata(Some(r#"{"title":"A"}"#)).expect("object")["title"], "A");
		assert!(parse_metadata(Some("[1]")).is_err());
		assert!(parse_metadata(Some("{")).is_err());
	}

	#[test]
	fn parses_search_command() {
		let args = Args::try_parse_from([
			"zdb-search",
			"--config",
			"zdb.toml",
			"search",
			"vector db",
			"--top-k",
			"500",
			"--min-score",
			"0.3",
		])
		.expect("Failed to parse args.");

		match args.command {
			Command::Search { query, top_k, min_score, collection } => {
				assert_eq!(query, "vector db");
				assert_eq!(top_k, 500);
				assert_eq!(min_score, Some(0.3));
				assert!(collection.is_none());
			},
			other => panic!("Unexpected command: {other:?}"),
		}
	}
}
