use std::collections::HashSet;

use rand::seq::IndexedRandom;
use regex::Regex;
use serde_json::json;

use karat_domain::{
	product::{self, ProductRecord},
	turn::{self, ConversationTurn},
};

use crate::Assistant;

pub(crate) const NO_RESULTS_MESSAGE: &str =
	"I'm sorry, I couldn't find any products that match your search.";
pub(crate) const GENERIC_FAILURE_MESSAGE: &str =
	"I'm sorry, I encountered an unexpected issue while processing your request. Please try again.";
pub(crate) const NO_INFORMATION_MESSAGE: &str =
	"I don't have that information on hand, but I'm happy to help with anything else about our products or policies.";
pub(crate) const CLARIFYING_FALLBACK: &str =
	"I'm not sure how to help with that. Can I assist with a product search or a policy question?";

const GREETINGS: &[&str] = &[
	"Hello! I'm Karat, your jewelry assistant. How can I help you today?",
	"Hi there! Ask me anything about our pieces or our policies.",
	"Welcome to Karat! What can I help you find today?",
	"Hey! Karat here, happy to help with products or policy questions.",
];
const COMPLIMENT_REPLIES: &[&str] = &[
	"Thank you, that's lovely to hear! Is there anything else I can help with?",
	"So glad you're happy! Let me know if you'd like to see anything else.",
	"Thanks so much! I'm here if you need anything more.",
];

const PRODUCT_QA_PROMPT: &str = "\
You are Karat, a friendly and knowledgeable jewelry assistant for our \
online store. Answer the customer using only the products listed in the \
context below and the conversation so far. Never mention a product, SKU, \
or price that does not appear in the context. When you present a product, \
include its name, SKU, and price. If several products fit, summarize them \
briefly and recommend one rather than listing everything mechanically. \
Keep the tone warm and conversational.";
const POLICY_PROMPT: &str = "\
You are a customer service specialist for a jewelry store. Answer the \
customer's question clearly and accurately using only the policy excerpts \
below and the conversation so far. If the excerpts do not cover the \
question, say you do not have that information.";
const FAQ_PROMPT: &str = "\
You are a friendly jewelry expert. Answer the customer's question using \
only the FAQ entries below and the conversation so far. If the entries do \
not cover the question, say you do not have that information.";

impl Assistant {
	/// Grounded product answer. The generation call receives only the
	/// evidence, the history, and the question; a reply that mentions an
	/// identifier outside the evidence set is discarded in favor of the
	/// deterministic listing of what was actually retrieved.
	pub(crate) async fn compose_product_answer(
		&self,
		conversation_id: &str,
		query: &str,
		history: &[ConversationTurn],
		records: &[ProductRecord],
	) -> String {
		if records.is_empty() {
			return NO_RESULTS_MESSAGE.to_string();
		}

		let evidence = product::render_evidence(records);
		let transcript = turn::render_history(history);
		let system = format!(
			"{PRODUCT_QA_PROMPT}\n\nConversation so far:\n{transcript}\n\nContext (retrieved products):\n{evidence}"
		);
		let messages = [
			json!({ "role": "system", "content": system }),
			json!({ "role": "user", "content": query }),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(answer) => {
				let known: HashSet<&str> =
					records.iter().map(|record| record.sku.as_str()).collect();
				let ungrounded: Vec<String> = product::extract_identifiers(&answer)
					.into_iter()
					.filter(|id| !known.contains(id.as_str()))
					.collect();

				if ungrounded.is_empty() {
					answer
				} else {
					tracing::warn!(
						conversation_id,
						ungrounded = ?ungrounded,
						stage = "generation",
						"Answer mentioned identifiers outside the evidence; replying with the retrieved listing instead."
					);

					product::format_listing(records, 0)
				}
			},
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "generation",
					"Product answer generation failed."
				);

				GENERIC_FAILURE_MESSAGE.to_string()
			},
		}
	}

	pub(crate) async fn compose_policy_answer(
		&self,
		conversation_id: &str,
		query: &str,
		history: &[ConversationTurn],
		context: &str,
	) -> String {
		self.compose_passage_answer(conversation_id, query, history, context, POLICY_PROMPT)
			.await
	}

	pub(crate) async fn compose_faq_answer(
		&self,
		conversation_id: &str,
		query: &str,
		history: &[ConversationTurn],
		context: &str,
	) -> String {
		self.compose_passage_answer(conversation_id, query, history, context, FAQ_PROMPT).await
	}

	async fn compose_passage_answer(
		&self,
		conversation_id: &str,
		query: &str,
		history: &[ConversationTurn],
		context: &str,
		prompt: &str,
	) -> String {
		if context.trim().is_empty() {
			return NO_INFORMATION_MESSAGE.to_string();
		}

		let transcript = turn::render_history(history);
		let system =
			format!("{prompt}\n\nConversation so far:\n{transcript}\n\nContext:\n{context}");
		let messages = [
			json!({ "role": "system", "content": system }),
			json!({ "role": "user", "content": query }),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(answer) => answer,
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "generation",
					"Passage answer generation failed."
				);

				GENERIC_FAILURE_MESSAGE.to_string()
			},
		}
	}
}

// No grounding is required for pleasantries, so a uniform random pick from
// the fixed pool is fine.
pub(crate) fn canned_greeting() -> String {
	GREETINGS.choose(&mut rand::rng()).copied().unwrap_or(GREETINGS[0]).to_string()
}

pub(crate) fn canned_compliment_reply() -> String {
	COMPLIMENT_REPLIES
		.choose(&mut rand::rng())
		.copied()
		.unwrap_or(COMPLIMENT_REPLIES[0])
		.to_string()
}

/// Collapses runs of intra-line spaces/tabs and trims the ends. Applied to
/// every outgoing reply.
pub(crate) fn normalize_whitespace(text: &str) -> String {
	match Regex::new(r"[ \t]{2,}") {
		Ok(re) => re.replace_all(text, " ").trim().to_string(),
		Err(_) => text.trim().to_string(),
	}
}
