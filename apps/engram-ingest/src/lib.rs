use std::sync::Arc;

use clap::Parser;
use tokio::{
	io::{AsyncBufReadExt, BufReader},
	signal,
};
use tracing_subscriber::EnvFilter;

use engram_service::{EmbeddingQueue, HttpEmbedding, IngestionStore, StoreMemoryInput, StoreOutcome};
use engram_storage::db::Db;

const STDIN_SOURCE: &str = "stdin";

/// Reference adapter: one memory per stdin line, stored and queued for embedding.
#[derive(Debug, Parser)]
#[command(rename_all = "kebab")]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: std::path::PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = engram_config::load(&args.config)?;
	let filter = EnvFilter::new(config.service.log_level.clone());

	tracing_subscriber::fmt().with_env_filter(filter).init();

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.providers.embedding.dimensions).await?;

	let store = IngestionStore::new(db.clone());
	let queue = EmbeddingQueue::new(
		db,
		config.providers.embedding.clone(),
		Arc::new(HttpEmbedding),
		config.ingestion.queue_concurrency,
	);
	let mut lines = BufReader::new(tokio::io::stdin()).lines();

	// Shutdown order: stop accepting input, then drain in-flight embedding work, then exit.
	loop {
		tokio::select! {
			_ = signal::ctrl_c() => {
				tracing::info!("Received interrupt, stopping intake.");

				break;
			},
			line = lines.next_line() => {
				let Some(line) = line? else {
					break;
				};

				ingest_line(&store, &queue, &line).await;
			},
		}
	}

	tracing::info!("Draining embedding queue.");
	queue.drain().await;

	Ok(())
}

async fn ingest_line(store: &IngestionStore, queue: &EmbeddingQueue, line: &str) {
	let content = line.trim();

	if content.is_empty() {
		return;
	}

	let input = StoreMemoryInput {
		content: content.to_string(),
		source: STDIN_SOURCE.to_string(),
		..StoreMemoryInput::default()
	};

	match store.store(input).await {
		Ok(StoreOutcome::Created(memory)) => {
			tracing::info!(memory_id = %memory.id, "Memory stored.");
			queue.enqueue(memory.id);
		},
		Ok(StoreOutcome::Deduplicated) => {
			tracing::info!("Memory already stored, skipping.");
		},
		Err(err) => {
			tracing::error!(error = %err, "Failed to store memory.");
		},
	}
}
