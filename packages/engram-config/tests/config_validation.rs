use toml::Value;

use engram_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn parse_sample() -> Config {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn sample_with<F>(mutate: F) -> Config
where
	F: FnOnce(&mut toml::map::Map<String, Value>),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let root = value.as_table_mut().expect("Sample config must be a table.");

	mutate(root);

	let raw = toml::to_string(&value).expect("Failed to render sample config.");

	toml::from_str(&raw).expect("Failed to parse mutated config.")
}

fn embedding_table(root: &mut toml::map::Map<String, Value>) -> &mut toml::map::Map<String, Value> {
	root.get_mut("providers")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers].")
		.get_mut("embedding")
		.and_then(Value::as_table_mut)
		.expect("Sample config must include [providers.embedding].")
}

#[test]
fn sample_config_validates() {
	let cfg = parse_sample();

	engram_config::validate(&cfg).expect("Sample config must validate.");
}

#[test]
fn queue_concurrency_defaults_to_three() {
	let cfg = sample_with(|root| {
		let ingestion = root
			.get_mut("ingestion")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [ingestion].");

		ingestion.remove("queue_concurrency");
	});

	assert_eq!(cfg.ingestion.queue_concurrency, 3);
}

#[test]
fn rejects_zero_embedding_dimensions() {
	let cfg = sample_with(|root| {
		embedding_table(root).insert("dimensions".to_string(), Value::Integer(0));
	});

	let err = engram_config::validate(&cfg).expect_err("Zero dimensions must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_zero_queue_concurrency() {
	let cfg = sample_with(|root| {
		let ingestion = root
			.get_mut("ingestion")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [ingestion].");

		ingestion.insert("queue_concurrency".to_string(), Value::Integer(0));
	});

	let err = engram_config::validate(&cfg).expect_err("Zero concurrency must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_empty_dsn() {
	let cfg = sample_with(|root| {
		let postgres = root
			.get_mut("storage")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage].")
			.get_mut("postgres")
			.and_then(Value::as_table_mut)
			.expect("Sample config must include [storage.postgres].");

		postgres.insert("dsn".to_string(), Value::String(String::new()));
	});

	let err = engram_config::validate(&cfg).expect_err("Empty dsn must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_empty_model() {
	let cfg = sample_with(|root| {
		embedding_table(root).insert("model".to_string(), Value::String("  ".to_string()));
	});

	let err = engram_config::validate(&cfg).expect_err("Blank model must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_zero_timeout() {
	let cfg = sample_with(|root| {
		embedding_table(root).insert("timeout_ms".to_string(), Value::Integer(0));
	});

	let err = engram_config::validate(&cfg).expect_err("Zero timeout must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}
