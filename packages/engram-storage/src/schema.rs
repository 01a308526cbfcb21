/// Logical schema for the ingestion pipeline. The embedding column dimensionality is substituted
/// at bootstrap time so the same schema serves any configured model.
const SCHEMA_SQL: &str = "\
CREATE EXTENSION IF NOT EXISTS vector;

CREATE TABLE IF NOT EXISTS memories (
	id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
	content text NOT NULL,
	search tsvector GENERATED ALWAYS AS (to_tsvector('english', content)) STORED,
	category text,
	source text NOT NULL,
	tags text[],
	metadata jsonb,
	source_date timestamptz,
	created_at timestamptz NOT NULL DEFAULT now(),
	updated_at timestamptz NOT NULL DEFAULT now(),
	deleted_at timestamptz
);

CREATE INDEX IF NOT EXISTS idx_memories_search ON memories USING gin (search);

CREATE INDEX IF NOT EXISTS idx_memories_tags ON memories USING gin (tags);

CREATE TABLE IF NOT EXISTS memory_embeddings (
	id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
	memory_id uuid NOT NULL REFERENCES memories (id),
	model text NOT NULL,
	embedding vector(<VECTOR_DIM>) NOT NULL,
	created_at timestamptz NOT NULL DEFAULT now(),
	CONSTRAINT uq_memory_embeddings_memory_id_model UNIQUE (memory_id, model)
);

CREATE TABLE IF NOT EXISTS ingestion_log (
	id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
	source text NOT NULL,
	external_id text,
	dedup_hash text NOT NULL,
	memory_id uuid NOT NULL REFERENCES memories (id),
	created_at timestamptz NOT NULL DEFAULT now()
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_ingestion_log_source_dedup_hash
	ON ingestion_log (source, dedup_hash);

CREATE INDEX IF NOT EXISTS idx_ingestion_log_source_external_id
	ON ingestion_log (source, external_id);
";

/// Sole dedup authority; a unique-violation on this index means a concurrent ingestion won.
pub const INGESTION_LOG_DEDUP_INDEX: &str = "idx_ingestion_log_source_dedup_hash";

pub fn render_schema(vector_dim: u32) -> String {
	SCHEMA_SQL.replace("<VECTOR_DIM>", &vector_dim.to_string())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn substitutes_vector_dimension() {
		let sql = render_schema(768);

		assert!(sql.contains("vector(768)"));
		assert!(!sql.contains("<VECTOR_DIM>"));
	}
}
