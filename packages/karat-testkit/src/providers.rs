use std::{
	collections::VecDeque,
	sync::{
		Mutex,
		atomic::{AtomicBool, Ordering},
	},
};

use color_eyre::eyre;
use serde_json::Value;

use karat_config::{ChatProviderConfig, EmbeddingProviderConfig};
use karat_service::{BoxFuture, ChatProvider, EmbeddingProvider};

/// Embedding provider backed by [`crate::embed_text`]; no network.
#[derive(Default)]
pub struct StubEmbedding {
	failing: AtomicBool,
}
impl StubEmbedding {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}
}
impl EmbeddingProvider for StubEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, color_eyre::Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			if self.failing.load(Ordering::SeqCst) {
				return Err(eyre::eyre!("Embedding provider is unavailable."));
			}

			Ok(texts.iter().map(|text| crate::embed_text(cfg.dimensions as usize, text)).collect())
		})
	}
}

enum ScriptedReply {
	Text(String),
	Failure(String),
}

/// Chat provider that replays a queue of scripted replies in order. An
/// exhausted queue is an error so a test notices an unexpected extra call.
#[derive(Default)]
pub struct ScriptedChat {
	replies: Mutex<VecDeque<ScriptedReply>>,
}
impl ScriptedChat {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&self, reply: impl Into<String>) {
		self.replies
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push_back(ScriptedReply::Text(reply.into()));
	}

	pub fn push_failure(&self, message: impl Into<String>) {
		self.replies
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push_back(ScriptedReply::Failure(message.into()));
	}

	pub fn remaining(&self) -> usize {
		self.replies.lock().unwrap_or_else(|err| err.into_inner()).len()
	}
}
impl ChatProvider for ScriptedChat {
	fn complete<'a>(
		&'a self,
		_cfg: &'a ChatProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, color_eyre::Result<String>> {
		Box::pin(async move {
			let reply = self.replies.lock().unwrap_or_else(|err| err.into_inner()).pop_front();

			match reply {
				Some(ScriptedReply::Text(text)) => Ok(text),
				Some(ScriptedReply::Failure(message)) => Err(eyre::eyre!(message)),
				None => Err(eyre::eyre!("No scripted chat reply queued.")),
			}
		})
	}
}
