mod index;
mod providers;

pub use index::MemoryIndex;
pub use providers::{ScriptedChat, StubEmbedding};

/// Deterministic bag-of-words embedding shared by the stub provider and
/// test fixtures, so seeded points and query vectors score against each
/// other meaningfully.
pub fn embed_text(dimensions: usize, text: &str) -> Vec<f32> {
	let dimensions = dimensions.max(1);
	let mut vector = vec![0.0_f32; dimensions];

	for token in
		text.to_lowercase().split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty())
	{
		// FNV-1a keeps the bucketing stable across platforms.
		let mut hash = 0xcbf2_9ce4_8422_2325_u64;

		for byte in token.bytes() {
			hash ^= byte as u64;
			hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
		}

		vector[(hash % dimensions as u64) as usize] += 1.0;
	}

	let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();

	if norm > 0.0 {
		for value in &mut vector {
			*value /= norm;
		}
	}

	vector
}

/// A valid config wired for tests: small vector dimension, localhost
/// endpoints, dummy keys. Tests mutate fields before building an
/// assistant when they need different lifecycle bounds.
pub fn test_config() -> karat_config::Config {
	let raw = r#"
[service]
http_bind = "127.0.0.1:0"
log_level = "warn"

[storage.qdrant]
url                 = "http://127.0.0.1:6334"
products_collection = "test_products"
policies_collection = "test_policies"
faqs_collection     = "test_faqs"
vector_dim          = 8

[providers.embedding]
provider_id = "stub"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/v1/embeddings"
model       = "stub-embedding"
dimensions  = 8
timeout_ms  = 1000

[providers.chat]
provider_id = "stub"
api_base    = "http://127.0.0.1:1"
api_key     = "test-key"
path        = "/v1/chat/completions"
model       = "stub-chat"
temperature = 0.0
max_tokens  = 256
timeout_ms  = 1000

[session]
idle_timeout_secs = 1200
max_history_pairs = 10

[retrieval]
product_candidate_k = 10
product_top_k       = 5
passage_top_k       = 5

[chunking]
max_chars     = 700
overlap_chars = 150
"#;

	toml::from_str(raw).expect("Test config must parse.")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn embedding_is_deterministic_and_normalized() {
		let first = embed_text(8, "gold necklace");
		let second = embed_text(8, "gold necklace");

		assert_eq!(first, second);

		let norm: f32 = first.iter().map(|v| v * v).sum::<f32>().sqrt();

		assert!((norm - 1.0).abs() < 1e-5);
	}

	#[test]
	fn related_texts_score_higher_than_unrelated() {
		let query = embed_text(8, "gold necklace");
		let related = embed_text(8, "a gold necklace with pearls");
		let unrelated = embed_text(8, "privacy policy data retention");
		let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };

		assert!(dot(&query, &related) > dot(&query, &unrelated));
	}

	#[test]
	fn test_config_passes_validation() {
		karat_config::validate(&test_config()).expect("Test config must validate.");
	}
}
