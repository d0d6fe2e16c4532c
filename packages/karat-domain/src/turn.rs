use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	User,
	Assistant,
}
impl Role {
	fn display_name(self) -> &'static str {
		match self {
			Self::User => "User",
			Self::Assistant => "Assistant",
		}
	}
}

/// One message in a conversation. Immutable once appended.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ConversationTurn {
	pub role: Role,
	pub content: String,
}
impl ConversationTurn {
	pub fn user(content: impl Into<String>) -> Self {
		Self { role: Role::User, content: content.into() }
	}

	pub fn assistant(content: impl Into<String>) -> Self {
		Self { role: Role::Assistant, content: content.into() }
	}
}

/// Renders turns as a plain transcript for prompt interpolation.
pub fn render_history(turns: &[ConversationTurn]) -> String {
	turns
		.iter()
		.map(|turn| format!("{}: {}", turn.role.display_name(), turn.content))
		.collect::<Vec<_>>()
		.join("\n")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_transcript_in_order() {
		let turns =
			vec![ConversationTurn::user("any gold rings?"), ConversationTurn::assistant("Yes!")];

		assert_eq!(render_history(&turns), "User: any gold rings?\nAssistant: Yes!");
	}
}
