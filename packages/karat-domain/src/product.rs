use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

const IDENTIFIER_PATTERN: &str = r"\b[A-Z0-9]{5,}\b";

/// A catalog entry as read back from the index. Owned by the inventory
/// collaborator; this crate only reads and formats it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ProductRecord {
	pub sku: String,
	pub title: String,
	pub product_type: String,
	pub price: f64,
	#[serde(default)]
	pub tags: String,
	#[serde(default)]
	pub description: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub stone: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub finish: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub weight: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dimensions: Option<String>,
}

/// First identifier-shaped token in a query: a contiguous run of at least
/// five uppercase letters/digits containing at least one letter. Bare
/// numbers are excluded so price figures never reach the exact-lookup path.
pub fn identifier_token(query: &str) -> Option<String> {
	Regex::new(IDENTIFIER_PATTERN).ok().and_then(|re| {
		re.find_iter(query)
			.map(|m| m.as_str())
			.find(|token| token.chars().any(|c| c.is_ascii_uppercase()))
			.map(|token| token.to_string())
	})
}

/// Every identifier-shaped token in a text, for grounding checks.
pub fn extract_identifiers(text: &str) -> HashSet<String> {
	Regex::new(IDENTIFIER_PATTERN)
		.map(|re| {
			re.find_iter(text)
				.map(|m| m.as_str())
				.filter(|token| token.chars().any(|c| c.is_ascii_uppercase()))
				.map(|token| token.to_string())
				.collect()
		})
		.unwrap_or_default()
}

/// Renders records as the evidence block a grounded answer is composed
/// from. One paragraph per record, matching the indexed document shape.
pub fn render_evidence(records: &[ProductRecord]) -> String {
	records
		.iter()
		.map(|record| {
			format!(
				"SKU: {}. Product Name: {}. Product Type: {}. Description: {}. Price: {:.2}",
				record.sku, record.title, record.product_type, record.description, record.price,
			)
		})
		.collect::<Vec<_>>()
		.join("\n\n")
}

/// Formats a slice of a result set as a numbered plain-text listing.
/// `start_index` is the absolute position of the first record so that
/// numbering stays continuous across paginated batches.
pub fn format_listing(records: &[ProductRecord], start_index: usize) -> String {
	let mut parts = Vec::new();

	if start_index == 0 {
		parts.push("I found the following product(s) for you:\n".to_string());
	}

	for (offset, record) in records.iter().enumerate() {
		let mut entry =
			format!("\n{}. {} (SKU: {})\n", start_index + offset + 1, record.title, record.sku);
		let mut details = Vec::new();

		if let Some(stone) = &record.stone {
			details.push(format!("   - Stone: {stone}"));
		}
		if let Some(color) = &record.color {
			details.push(format!("   - Color: {color}"));
		}
		if let Some(finish) = &record.finish {
			details.push(format!("   - Finish: {finish}"));
		}
		if let Some(weight) = record.weight {
			details.push(format!("   - Weight: {weight:.2} grams"));
		}
		if let Some(dimensions) = &record.dimensions {
			details.push(format!("   - Dimensions: {dimensions}"));
		}

		details.push(format!("   - Price: ₹{:.2}", record.price));

		entry.push_str(&details.join("\n"));
		entry.push('\n');
		parts.push(entry);
	}

	parts.concat()
}
