use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = zdb_search_app::Args::parse();

	zdb_search_app::run(args).await
}
