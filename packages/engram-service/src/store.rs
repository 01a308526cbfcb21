use serde_json::Value;
use sha2::{Digest, Sha256};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Error, Result};
use engram_storage::{
	db::Db,
	models::Memory,
	queries::{self, NewMemory},
	schema,
};

#[derive(Clone, Debug, Default)]
pub struct StoreMemoryInput {
	pub content: String,
	pub source: String,
	pub category: Option<String>,
	pub tags: Option<Vec<String>>,
	pub metadata: Option<Value>,
	pub source_date: Option<OffsetDateTime>,
	pub external_id: Option<String>,
}

/// A duplicate ingestion is an expected outcome, never an error.
#[derive(Debug)]
pub enum StoreOutcome {
	Created(Memory),
	Deduplicated,
}
impl StoreOutcome {
	pub fn deduplicated(&self) -> bool {
		matches!(self, Self::Deduplicated)
	}
}

pub struct IngestionStore {
	db: Db,
}
impl IngestionStore {
	pub fn new(db: Db) -> Self {
		Self { db }
	}

	/// Stores a memory at most once per `(source, source_date, content)`.
	///
	/// The dedup check and both inserts run in one transaction; the unique index on
	/// `(source, dedup_hash)` backstops writers that race past the check, so either both rows
	/// commit or neither does.
	pub async fn store(&self, input: StoreMemoryInput) -> Result<StoreOutcome> {
		if input.content.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "content must be non-empty.".to_string() });
		}
		if input.source.trim().is_empty() {
			return Err(Error::InvalidRequest { message: "source must be non-empty.".to_string() });
		}

		let dedup_hash = compute_dedup_hash(&input.source, input.source_date, &input.content);
		let mut tx = self.db.pool.begin().await.map_err(engram_storage::Error::from)?;

		if queries::find_log_entry_tx(&mut tx, &input.source, &dedup_hash).await?.is_some() {
			tracing::debug!(source = %input.source, %dedup_hash, "Duplicate memory detected, skipping.");

			tx.rollback().await.map_err(engram_storage::Error::from)?;

			return Ok(StoreOutcome::Deduplicated);
		}

		let new_memory = NewMemory {
			content: input.content,
			category: input.category,
			source: input.source,
			tags: input.tags,
			metadata: input.metadata,
			source_date: input.source_date,
		};
		let memory = queries::insert_memory_tx(&mut tx, &new_memory).await?;
		let log_insert = queries::insert_log_entry_tx(
			&mut tx,
			&memory.source,
			input.external_id.as_deref(),
			&dedup_hash,
			memory.id,
		)
		.await;

		if let Err(err) = log_insert {
			// A concurrent writer with the same (source, hash) committed first; their row wins
			// and this transaction leaves nothing behind.
			if err.is_unique_violation(schema::INGESTION_LOG_DEDUP_INDEX) {
				tracing::debug!(source = %memory.source, %dedup_hash, "Lost dedup race, skipping.");

				tx.rollback().await.map_err(engram_storage::Error::from)?;

				return Ok(StoreOutcome::Deduplicated);
			}

			return Err(err.into());
		}

		tx.commit().await.map_err(engram_storage::Error::from)?;

		Ok(StoreOutcome::Created(memory))
	}
}

/// SHA-256 over `source:date:content`. An absent source date hashes as the empty string, so
/// timestamped and untimestamped ingestions of the same content never collide.
pub fn compute_dedup_hash(
	source: &str,
	source_date: Option<OffsetDateTime>,
	content: &str,
) -> String {
	let date_str = source_date
		.map(|date| date.format(&Rfc3339).unwrap_or_else(|_| date.unix_timestamp().to_string()))
		.unwrap_or_default();
	let digest = Sha256::digest(format!("{source}:{date_str}:{content}"));

	format!("{digest:x}")
}
