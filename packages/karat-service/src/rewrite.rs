use serde_json::json;

use karat_domain::turn::{self, ConversationTurn};

use crate::Assistant;

const REWRITE_SYSTEM_PROMPT: &str = "\
You rewrite follow-up questions into standalone search queries for a \
jewelry catalog. Fold the products and constraints referenced in the \
conversation into one short self-contained query suitable for a semantic \
search engine. For example, after a conversation about gold necklaces the \
follow-up \"what about under 10000?\" becomes \"gold necklaces under \
10000\". Reply with the rewritten query only, no explanations.";

impl Assistant {
	/// Folds conversation context into a standalone retrieval query.
	/// Retrieval must never see an error string, so any failure falls back
	/// to the original query text.
	pub(crate) async fn rewrite_query(
		&self,
		conversation_id: &str,
		query: &str,
		history: &[ConversationTurn],
	) -> String {
		let transcript = turn::render_history(history);
		let messages = [
			json!({ "role": "system", "content": REWRITE_SYSTEM_PROMPT }),
			json!({
				"role": "user",
				"content": format!("Conversation so far:\n{transcript}\n\nFollow-up question: {query}"),
			}),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(rewritten) if !rewritten.trim().is_empty() => {
				let rewritten = rewritten.trim().to_string();

				tracing::debug!(conversation_id, %rewritten, "Rewrote follow-up query.");

				rewritten
			},
			Ok(_) => query.to_string(),
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "rewrite",
					"Query rewrite failed; using the original query."
				);

				query.to_string()
			},
		}
	}
}
