use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::{Error, Result};
use engram_config::EmbeddingProviderConfig;

#[derive(Debug, Deserialize)]
struct EmbedResponse {
	embeddings: Vec<Vec<f32>>,
}

/// Computes one embedding vector for `text`. Only the first vector of the response is used.
pub async fn embed(cfg: &EmbeddingProviderConfig, text: &str) -> Result<Vec<f32>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let body = serde_json::json!({
		"model": cfg.model,
		"input": text,
	});
	let res = client
		.post(&url)
		.headers(crate::request_headers(cfg.api_key.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await
		.map_err(|source| Error::Connect { url: url.clone(), source })?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();

		return Err(Error::Status { status: status.as_u16(), body });
	}

	let parsed: EmbedResponse = res.json().await?;

	first_embedding(parsed)
}

fn first_embedding(parsed: EmbedResponse) -> Result<Vec<f32>> {
	parsed.embeddings.into_iter().next().ok_or_else(|| Error::InvalidResponse {
		message: "Embedding response contains no vectors.".to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn takes_first_vector() {
		let parsed: EmbedResponse =
			serde_json::from_str(r#"{"embeddings": [[0.1, 0.2, 0.3], [9.0, 9.0, 9.0]]}"#)
				.expect("Failed to parse response.");
		let vec = first_embedding(parsed).expect("Expected a vector.");

		assert_eq!(vec, vec![0.1, 0.2, 0.3]);
	}

	#[test]
	fn rejects_empty_embeddings_array() {
		let parsed: EmbedResponse =
			serde_json::from_str(r#"{"embeddings": []}"#).expect("Failed to parse response.");
		let err = first_embedding(parsed).expect_err("Empty response must be rejected.");

		assert!(matches!(err, Error::InvalidResponse { .. }));
	}
}
