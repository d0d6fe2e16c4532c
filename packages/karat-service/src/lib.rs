pub mod compose;
pub mod intent;
pub mod paginate;
pub mod passages;
pub mod respond;
pub mod retrieve;
pub mod rewrite;
pub mod session;
pub mod slots;

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;

use karat_config::{ChatProviderConfig, Config, EmbeddingProviderConfig};
use karat_providers::{chat, embedding};
use karat_storage::VectorIndex;

use crate::session::SessionStore;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>>;
}

pub trait ChatProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub chat: Arc<dyn ChatProvider>,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(embedding::embed(cfg, texts))
	}
}

impl ChatProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a ChatProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(chat::complete(cfg, messages))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>, chat: Arc<dyn ChatProvider>) -> Self {
		Self { embedding, chat }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);
		Self { embedding: provider.clone(), chat: provider }
	}
}

/// The per-turn pipeline plus the session state that makes it
/// context-aware. Both transports route every exchange through
/// [`Assistant::respond`].
pub struct Assistant {
	pub cfg: Config,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
	pub(crate) sessions: SessionStore,
}
impl Assistant {
	pub fn new(cfg: Config, index: Arc<dyn VectorIndex>) -> Self {
		Self::with_providers(cfg, index, Providers::default())
	}

	pub fn with_providers(cfg: Config, index: Arc<dyn VectorIndex>, providers: Providers) -> Self {
		let sessions = SessionStore::new(
			Duration::from_secs(cfg.session.idle_timeout_secs),
			cfg.session.max_history_pairs,
		);

		Self { cfg, index, providers, sessions }
	}

	pub fn active_sessions(&self) -> usize {
		self.sessions.active_sessions()
	}

	pub(crate) async fn embed_query(&self, query: &str) -> color_eyre::Result<Vec<f32>> {
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&query.to_string()))
			.await?;
		let vector = embeddings.into_iter().next().ok_or_else(|| {
			color_eyre::eyre::eyre!("Embedding provider returned no vectors.")
		})?;

		if vector.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(color_eyre::eyre::eyre!("Embedding vector dimension mismatch."));
		}

		Ok(vector)
	}
}
