use std::sync::{Arc, Mutex};

use tokio::sync::{Semaphore, mpsc, oneshot};
use uuid::Uuid;

use crate::{EmbeddingProvider, Result};
use engram_config::EmbeddingProviderConfig;
use engram_storage::{db::Db, queries};

/// Background embedding pipeline: accepts memory ids, computes vectors under a fixed concurrency
/// cap, and persists them. Per-item failures are logged and swallowed; they never reach the
/// caller of `enqueue` or `drain`.
pub struct EmbeddingQueue {
	submit: mpsc::UnboundedSender<Job>,
	jobs: Mutex<Vec<oneshot::Receiver<()>>>,
}

struct Job {
	memory_id: Uuid,
	done: oneshot::Sender<()>,
}

struct QueueShared {
	db: Db,
	cfg: EmbeddingProviderConfig,
	provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingQueue {
	pub fn new(
		db: Db,
		cfg: EmbeddingProviderConfig,
		provider: Arc<dyn EmbeddingProvider>,
		concurrency: usize,
	) -> Self {
		let shared = Arc::new(QueueShared { db, cfg, provider });
		let (submit, feed) = mpsc::unbounded_channel();

		tokio::spawn(dispatch(shared, feed, concurrency));

		Self { submit, jobs: Mutex::new(Vec::new()) }
	}

	/// Schedules embedding work for `memory_id` and returns immediately. Waiting items receive
	/// execution slots in strict submission order.
	pub fn enqueue(&self, memory_id: Uuid) {
		let (done, finished) = oneshot::channel();

		// The dispatcher holds its receiver for as long as any handle to the queue is alive.
		if self.submit.send(Job { memory_id, done }).is_ok() {
			self.jobs.lock().unwrap_or_else(|err| err.into_inner()).push(finished);
		}
	}

	/// Waits for every job scheduled before this call to reach a terminal state. Jobs enqueued
	/// concurrently with a drain are picked up by the next one.
	pub async fn drain(&self) {
		let jobs =
			std::mem::take(&mut *self.jobs.lock().unwrap_or_else(|err| err.into_inner()));

		for finished in jobs {
			// A dropped sender means the job is already terminal.
			let _ = finished.await;
		}
	}
}

/// Single dispatcher: jobs arrive in submission order and a free slot is awaited before the next
/// job starts, so slot assignment is FIFO even under a work-stealing runtime.
async fn dispatch(
	shared: Arc<QueueShared>,
	mut feed: mpsc::UnboundedReceiver<Job>,
	concurrency: usize,
) {
	let slots = Arc::new(Semaphore::new(concurrency));

	while let Some(Job { memory_id, done }) = feed.recv().await {
		let Ok(permit) = slots.clone().acquire_owned().await else {
			// The semaphore is never closed while the dispatcher runs.
			return;
		};
		let shared = shared.clone();

		tokio::spawn(async move {
			process_memory(&shared, memory_id).await;
			drop(permit);

			let _ = done.send(());
		});
	}
}

async fn process_memory(shared: &QueueShared, memory_id: Uuid) {
	match embed_memory(shared, memory_id).await {
		Ok(true) => {
			tracing::debug!(%memory_id, model = %shared.cfg.model, "Embedding stored.");
		},
		Ok(false) => {
			tracing::warn!(%memory_id, "Memory not found for embedding.");
		},
		Err(err) => {
			tracing::error!(%memory_id, error = %err, "Failed to process embedding.");
		},
	}
}

async fn embed_memory(shared: &QueueShared, memory_id: Uuid) -> Result<bool> {
	let Some(memory) = queries::fetch_memory(&shared.db, memory_id).await? else {
		return Ok(false);
	};
	let vector = shared.provider.embed(&shared.cfg, &memory.content).await?;

	queries::insert_embedding(&shared.db, memory_id, &shared.cfg.model, &vector).await?;

	Ok(true)
}
