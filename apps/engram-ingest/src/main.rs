use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = engram_ingest::Args::parse();

	engram_ingest::run(args).await
}
