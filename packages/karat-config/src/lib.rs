mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	ChatProviderConfig, Chunking, Config, Corpus, EmbeddingProviderConfig, Providers, Qdrant,
	Retrieval, Service, Session, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.qdrant.url.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.url must be non-empty.".to_string(),
		});
	}

	for (label, collection) in [
		("products_collection", &cfg.storage.qdrant.products_collection),
		("policies_collection", &cfg.storage.qdrant.policies_collection),
		("faqs_collection", &cfg.storage.qdrant.faqs_collection),
	] {
		if collection.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("storage.qdrant.{label} must be non-empty."),
			});
		}
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}

	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("chat", cfg.providers.chat.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation {
				message: format!("Provider {label} timeout_ms must be greater than zero."),
			});
		}
	}
	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("chat", &cfg.providers.chat.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("Provider {label} api_key must be non-empty."),
			});
		}
	}

	if !cfg.providers.chat.temperature.is_finite() || cfg.providers.chat.temperature < 0.0 {
		return Err(Error::Validation {
			message: "providers.chat.temperature must be a non-negative finite number."
				.to_string(),
		});
	}
	if cfg.providers.chat.max_tokens == 0 {
		return Err(Error::Validation {
			message: "providers.chat.max_tokens must be greater than zero.".to_string(),
		});
	}

	if cfg.session.idle_timeout_secs == 0 {
		return Err(Error::Validation {
			message: "session.idle_timeout_secs must be greater than zero.".to_string(),
		});
	}
	if cfg.session.max_history_pairs == 0 {
		return Err(Error::Validation {
			message: "session.max_history_pairs must be greater than zero.".to_string(),
		});
	}

	if cfg.retrieval.product_top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.product_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.retrieval.product_candidate_k < cfg.retrieval.product_top_k {
		return Err(Error::Validation {
			message: "retrieval.product_candidate_k must be at least retrieval.product_top_k."
				.to_string(),
		});
	}
	if cfg.retrieval.passage_top_k == 0 {
		return Err(Error::Validation {
			message: "retrieval.passage_top_k must be greater than zero.".to_string(),
		});
	}

	if cfg.chunking.max_chars == 0 {
		return Err(Error::Validation {
			message: "chunking.max_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.chunking.overlap_chars >= cfg.chunking.max_chars {
		return Err(Error::Validation {
			message: "chunking.overlap_chars must be less than chunking.max_chars.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	// Request URLs are built as api_base + path.
	while cfg.providers.embedding.api_base.ends_with('/') {
		cfg.providers.embedding.api_base.pop();
	}
	while cfg.providers.chat.api_base.ends_with('/') {
		cfg.providers.chat.api_base.pop();
	}
}
