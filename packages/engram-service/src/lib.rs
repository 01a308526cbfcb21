pub mod queue;
pub mod store;

use std::{future::Future, pin::Pin};

pub use queue::EmbeddingQueue;
pub use store::{IngestionStore, StoreMemoryInput, StoreOutcome};

use engram_config::EmbeddingProviderConfig;
use engram_providers::embedding;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error(transparent)]
	Storage(#[from] engram_storage::Error),
	#[error(transparent)]
	Provider(#[from] engram_providers::Error),
}

/// Seam for the external embedding function; the queue only depends on "text in, vector out".
pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, engram_providers::Result<Vec<f32>>>;
}

pub struct HttpEmbedding;
impl EmbeddingProvider for HttpEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, engram_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed(cfg, text))
	}
}
