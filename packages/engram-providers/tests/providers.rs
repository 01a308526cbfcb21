use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};

#[test]
fn builds_bearer_auth_header() {
	let headers = engram_providers::request_headers(Some("secret"), &Map::new())
		.expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
	assert_eq!(headers.get(CONTENT_TYPE).expect("Missing content type."), "application/json");
}

#[test]
fn omits_auth_header_without_api_key() {
	let headers =
		engram_providers::request_headers(None, &Map::new()).expect("Failed to build headers.");

	assert!(headers.get(AUTHORIZATION).is_none());
}

#[test]
fn attaches_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-api-version".to_string(), Value::String("1".to_string()));

	let headers =
		engram_providers::request_headers(None, &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-api-version").expect("Missing default header."), "1");
}

#[test]
fn rejects_non_string_default_header() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::Number(3.into()));

	let err = engram_providers::request_headers(None, &defaults)
		.expect_err("Non-string header must be rejected.");

	assert!(matches!(err, engram_providers::Error::InvalidConfig { .. }));
}
