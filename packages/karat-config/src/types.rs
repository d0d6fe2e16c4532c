use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub session: Session,
	pub retrieval: Retrieval,
	pub chunking: Chunking,
	pub corpus: Option<Corpus>,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub products_collection: String,
	pub policies_collection: String,
	pub faqs_collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub chat: ChatProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ChatProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub max_tokens: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Session {
	/// Idle time after which a conversation is discarded on next access.
	pub idle_timeout_secs: u64,
	/// History bound, counted in user/assistant pairs.
	pub max_history_pairs: u32,
}

#[derive(Debug, Deserialize)]
pub struct Retrieval {
	pub product_candidate_k: u32,
	pub product_top_k: u32,
	pub passage_top_k: u32,
}

#[derive(Debug, Deserialize)]
pub struct Chunking {
	pub max_chars: u32,
	pub overlap_chars: u32,
}

#[derive(Debug, Deserialize)]
pub struct Corpus {
	pub faqs_csv: PathBuf,
	pub return_policy: PathBuf,
	pub shipping_policy: PathBuf,
	pub privacy_policy: PathBuf,
}
