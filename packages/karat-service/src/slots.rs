use serde_json::{Value, json};

use karat_domain::slots::{ProductSearchState, SlotParseError, SlotPatch};

use crate::Assistant;

const SLOT_SYSTEM_PROMPT: &str = "\
You maintain the search filters for a jewelry catalog. The recognized \
filter keys are category, subcategory, stone, color, finish, min_price, \
and max_price. Read the user query against the current filters and reply \
with a JSON object containing only the keys that change: set a key to its \
new value when the user supplies one, and to null when the user drops that \
constraint (for example \"any color is fine\" sets color to null). Price \
rules: \"under 5000\" means max_price 5000; \"over 3000\" means min_price \
3000; \"between 2000 and 7000\" means min_price 2000 and max_price 7000. \
Reply with the JSON object only, no other text.";

impl Assistant {
	/// Extracts a slot patch from the current query and merges it into the
	/// running state. Malformed extractor output is a logged no-op; the
	/// turn continues with the previous constraints.
	pub(crate) async fn update_search_state(
		&self,
		conversation_id: &str,
		query: &str,
		state: &mut ProductSearchState,
	) {
		let current = serde_json::to_string(state).unwrap_or_else(|_| "{}".to_string());
		let messages = [
			json!({ "role": "system", "content": SLOT_SYSTEM_PROMPT }),
			json!({
				"role": "user",
				"content": format!("Current filters:\n{current}\n\nUser query:\n{query}"),
			}),
		];

		match self.providers.chat.complete(&self.cfg.providers.chat, &messages).await {
			Ok(reply) => match parse_slot_reply(&reply) {
				Ok(patch) => state.apply(&patch),
				Err(err) => {
					tracing::warn!(
						conversation_id,
						error = %err,
						stage = "slot_extraction",
						"Slot update did not parse; keeping the previous state."
					);
				},
			},
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "slot_extraction",
					"Slot extraction call failed; keeping the previous state."
				);
			},
		}
	}
}

pub(crate) fn parse_slot_reply(reply: &str) -> Result<SlotPatch, SlotParseError> {
	let stripped = strip_code_fence(reply);
	let value: Value = serde_json::from_str(stripped).map_err(|err| SlotParseError {
		message: format!("Slot update is not valid JSON: {err}."),
	})?;

	SlotPatch::from_json(&value)
}

// Models occasionally wrap the object in a markdown fence despite the
// prompt contract.
fn strip_code_fence(text: &str) -> &str {
	let trimmed = text.trim();
	let Some(rest) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let rest = rest.strip_prefix("json").unwrap_or(rest);

	rest.strip_suffix("```").map(str::trim).unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
	use super::*;

	use karat_domain::slots::SlotValue;

	#[test]
	fn parses_plain_json_object() {
		let patch = parse_slot_reply(r#"{ "category": "necklace", "max_price": 10000 }"#)
			.expect("valid reply");

		assert_eq!(patch.category, SlotValue::Set("necklace".to_string()));
		assert_eq!(patch.max_price, SlotValue::Set(10_000.0));
	}

	#[test]
	fn parses_fenced_json_object() {
		let patch = parse_slot_reply("```json\n{ \"color\": null }\n```").expect("valid reply");

		assert_eq!(patch.color, SlotValue::Clear);
	}

	#[test]
	fn rejects_prose_reply() {
		assert!(parse_slot_reply("Sure! I set the category to necklace.").is_err());
	}
}
