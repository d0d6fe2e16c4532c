use serde_json::json;

use karat_domain::intent::{self, Intent};

use crate::Assistant;

const INTENT_SYSTEM_PROMPT: &str = "\
You classify a single customer message for a jewelry storefront assistant. \
Reply with exactly one of these labels and nothing else: product_query, \
return_policy, shipping_policy, privacy_policy, general_faq, greeting, \
compliment, other. Use product_query for product searches, details, \
availability, prices, and recommendations; return_policy for returns, \
refunds, and exchanges; shipping_policy for shipping, delivery, and order \
tracking; privacy_policy for personal data and privacy; general_faq for \
general questions about the company, materials, or contact details; \
greeting for simple greetings; compliment for praise of the products or \
service; and other for anything that fits none of these.";

impl Assistant {
	/// Classification sees the current message only; prior turns are not
	/// sent. A model failure or an unparseable label falls back to the
	/// deterministic rule classifier and never fails the turn.
	pub(crate) async fn classify_intent(&self, conversation_id: &str, query: &str) -> Intent {
		let messages = [
			json!({ "role": "system", "content": INTENT_SYSTEM_PROMPT }),
			json!({ "role": "user", "content": format!("Customer message: {query}") }),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(reply) => match intent::parse_label(&reply) {
				Some(label) => label,
				None => {
					tracing::warn!(
						conversation_id,
						reply = %reply.trim(),
						stage = "intent",
						"Model returned an unknown intent label; using the rule fallback."
					);

					intent::classify_rules(query)
				},
			},
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "intent",
					"Intent classification call failed; using the rule fallback."
				);

				intent::classify_rules(query)
			},
		}
	}
}
