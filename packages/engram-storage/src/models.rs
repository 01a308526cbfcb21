use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored unit of ingested content. The generated `search` tsvector column is read-only and
/// never mapped here.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Memory {
	pub id: Uuid,
	pub content: String,
	pub category: Option<String>,
	pub source: String,
	pub tags: Option<Vec<String>>,
	pub metadata: Option<Value>,
	pub source_date: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
	pub deleted_at: Option<OffsetDateTime>,
}

/// Append-only provenance record; `(source, dedup_hash)` is the dedup authority.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct IngestionLogEntry {
	pub id: Uuid,
	pub source: String,
	pub external_id: Option<String>,
	pub dedup_hash: String,
	pub memory_id: Uuid,
	pub created_at: OffsetDateTime,
}
