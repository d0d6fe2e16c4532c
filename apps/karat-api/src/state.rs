use std::sync::Arc;

use karat_service::Assistant;
use karat_storage::QdrantIndex;

/// Startup outcome, checked by every handler. A failed bootstrap keeps the
/// process serving so the failure is visible as 503s instead of a crash
/// loop, and it is never retried silently.
#[derive(Clone)]
pub enum InitState {
	Ready(Arc<Assistant>),
	Failed(String),
}

#[derive(Clone)]
pub struct AppState {
	pub init: InitState,
}
impl AppState {
	pub async fn new(config: karat_config::Config) -> Self {
		let index = match QdrantIndex::new(&config.storage.qdrant) {
			Ok(index) => index,
			Err(err) => {
				tracing::error!(error = %err, "Vector index client construction failed.");

				return Self { init: InitState::Failed(err.to_string()) };
			},
		};

		if let Err(err) = index.ensure_collections().await {
			tracing::error!(error = %err, "Vector index bootstrap failed.");

			return Self { init: InitState::Failed(err.to_string()) };
		}

		let assistant = Assistant::new(config, Arc::new(index));

		Self { init: InitState::Ready(Arc::new(assistant)) }
	}

	pub fn ready(assistant: Arc<Assistant>) -> Self {
		Self { init: InitState::Ready(assistant) }
	}

	pub fn failed(reason: impl Into<String>) -> Self {
		Self { init: InitState::Failed(reason.into()) }
	}
}
