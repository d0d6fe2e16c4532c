use serde::{Deserialize, Serialize};

/// What the customer's current message is asking for. Recomputed every turn
/// from the current query text alone; never persisted.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
	ProductQuery,
	ReturnPolicy,
	ShippingPolicy,
	PrivacyPolicy,
	GeneralFaq,
	Greeting,
	Compliment,
	Other,
}
impl Intent {
	pub const ALL: [Self; 8] = [
		Self::ProductQuery,
		Self::ReturnPolicy,
		Self::ShippingPolicy,
		Self::PrivacyPolicy,
		Self::GeneralFaq,
		Self::Greeting,
		Self::Compliment,
		Self::Other,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::ProductQuery => "product_query",
			Self::ReturnPolicy => "return_policy",
			Self::ShippingPolicy => "shipping_policy",
			Self::PrivacyPolicy => "privacy_policy",
			Self::GeneralFaq => "general_faq",
			Self::Greeting => "greeting",
			Self::Compliment => "compliment",
			Self::Other => "other",
		}
	}
}

/// Parses a model-produced label. Exact match after normalization wins;
/// otherwise a label appearing as a substring is accepted, which salvages
/// verbose replies like "the intent is product_query".
pub fn parse_label(raw: &str) -> Option<Intent> {
	let normalized = normalize_label(raw);

	for intent in Intent::ALL {
		if normalized == intent.as_str() {
			return Some(intent);
		}
	}

	Intent::ALL.into_iter().find(|intent| normalized.contains(intent.as_str()))
}

fn normalize_label(raw: &str) -> String {
	raw.trim().to_lowercase().trim_end_matches(['.', '!', '?', ',', ':', ';']).to_string()
}

const GREETING_WORDS: &[&str] = &["hello", "hi", "hey", "namaste", "greetings"];
const GREETING_PHRASES: &[&str] = &["good morning", "good evening", "good afternoon"];
const RETURN_WORDS: &[&str] = &["return", "returns", "refund", "refunds", "exchange", "exchanges"];
const SHIPPING_WORDS: &[&str] =
	&["shipping", "ship", "delivery", "deliver", "track", "tracking", "dispatch"];
const PRIVACY_WORDS: &[&str] = &["privacy", "data", "gdpr"];
const PRIVACY_PHRASES: &[&str] = &["personal information", "personal data"];
const COMPLIMENT_WORDS: &[&str] = &["thanks", "great", "awesome", "lovely", "beautiful", "perfect"];
const COMPLIMENT_PHRASES: &[&str] = &["thank you", "love it", "love this", "well done"];
const PRODUCT_WORDS: &[&str] = &[
	"product", "products", "item", "items", "jewelry", "jewellery", "ring", "rings", "necklace",
	"necklaces", "bangle", "bangles", "earring", "earrings", "choker", "chokers", "pendant",
	"pendants", "bracelet", "bracelets", "stud", "studs", "price", "cost", "buy", "find", "show",
	"gold", "silver",
];

/// Deterministic fallback classifier. Keyword sets are checked in a fixed
/// priority order; matching is on whole word tokens so that e.g. "shipping"
/// never fires the greeting "hi".
pub fn classify_rules(query: &str) -> Intent {
	let lowered = query.to_lowercase();
	let tokens: Vec<&str> =
		lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).collect();
	let has_word = |words: &[&str]| tokens.iter().any(|token| words.contains(token));
	let has_phrase = |phrases: &[&str]| phrases.iter().any(|phrase| lowered.contains(phrase));

	if has_word(GREETING_WORDS) || has_phrase(GREETING_PHRASES) {
		return Intent::Greeting;
	}
	if has_word(RETURN_WORDS) {
		return Intent::ReturnPolicy;
	}
	if has_word(SHIPPING_WORDS) {
		return Intent::ShippingPolicy;
	}
	if has_word(PRIVACY_WORDS) || has_phrase(PRIVACY_PHRASES) {
		return Intent::PrivacyPolicy;
	}
	if has_word(COMPLIMENT_WORDS) || has_phrase(COMPLIMENT_PHRASES) {
		return Intent::Compliment;
	}
	if has_word(PRODUCT_WORDS) {
		return Intent::ProductQuery;
	}

	Intent::GeneralFaq
}
