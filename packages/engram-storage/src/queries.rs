use serde_json::Value;
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{IngestionLogEntry, Memory},
};

// The generated `search` column is excluded; it cannot be written and is not mapped.
const MEMORY_COLUMNS: &str = "\
id, content, category, source, tags, metadata, source_date, created_at, updated_at, deleted_at";

#[derive(Clone, Debug)]
pub struct NewMemory {
	pub content: String,
	pub category: Option<String>,
	pub source: String,
	pub tags: Option<Vec<String>>,
	pub metadata: Option<Value>,
	pub source_date: Option<OffsetDateTime>,
}

pub async fn find_log_entry_tx(
	tx: &mut Transaction<'_, Postgres>,
	source: &str,
	dedup_hash: &str,
) -> Result<Option<IngestionLogEntry>> {
	let entry = sqlx::query_as::<_, IngestionLogEntry>(
		"\
SELECT id, source, external_id, dedup_hash, memory_id, created_at
FROM ingestion_log
WHERE source = $1
	AND dedup_hash = $2
LIMIT 1",
	)
	.bind(source)
	.bind(dedup_hash)
	.fetch_optional(&mut **tx)
	.await?;

	Ok(entry)
}

pub async fn insert_memory_tx(
	tx: &mut Transaction<'_, Postgres>,
	memory: &NewMemory,
) -> Result<Memory> {
	let sql = format!(
		"\
INSERT INTO memories (content, category, source, tags, metadata, source_date, deleted_at)
VALUES ($1, $2, $3, $4, $5, $6, NULL)
RETURNING {MEMORY_COLUMNS}"
	);
	let row = sqlx::query_as::<_, Memory>(&sql)
		.bind(memory.content.as_str())
		.bind(memory.category.as_deref())
		.bind(memory.source.as_str())
		.bind(memory.tags.clone())
		.bind(memory.metadata.clone())
		.bind(memory.source_date)
		.fetch_one(&mut **tx)
		.await?;

	Ok(row)
}

pub async fn insert_log_entry_tx(
	tx: &mut Transaction<'_, Postgres>,
	source: &str,
	external_id: Option<&str>,
	dedup_hash: &str,
	memory_id: Uuid,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ingestion_log (source, external_id, dedup_hash, memory_id)
VALUES ($1, $2, $3, $4)",
	)
	.bind(source)
	.bind(external_id)
	.bind(dedup_hash)
	.bind(memory_id)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn fetch_memory(db: &Db, memory_id: Uuid) -> Result<Option<Memory>> {
	let sql = format!(
		"\
SELECT {MEMORY_COLUMNS}
FROM memories
WHERE id = $1
LIMIT 1"
	);
	let memory =
		sqlx::query_as::<_, Memory>(&sql).bind(memory_id).fetch_optional(&db.pool).await?;

	Ok(memory)
}

/// Idempotent per `(memory_id, model)`; re-embedding under the same model is a no-op.
pub async fn insert_embedding(
	db: &Db,
	memory_id: Uuid,
	model: &str,
	embedding: &[f32],
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO memory_embeddings (memory_id, model, embedding)
VALUES ($1, $2, $3::vector)
ON CONFLICT (memory_id, model) DO NOTHING",
	)
	.bind(memory_id)
	.bind(model)
	.bind(format_vector_text(embedding))
	.execute(&db.pool)
	.await?;

	Ok(())
}

// pgvector has no native sqlx codec; the text literal form round-trips exactly.
pub fn format_vector_text(vec: &[f32]) -> String {
	let mut out = String::from("[");

	for (idx, value) in vec.iter().enumerate() {
		if idx > 0 {
			out.push(',');
		}
		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formats_vector_literal() {
		assert_eq!(format_vector_text(&[0.1, 0.2, 0.3]), "[0.1,0.2,0.3]");
		assert_eq!(format_vector_text(&[]), "[]");
	}
}
