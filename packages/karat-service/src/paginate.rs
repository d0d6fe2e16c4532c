use karat_domain::product::{self, ProductRecord};

/// Records disclosed per batch.
pub const PAGE_SIZE: usize = 3;

const CONTINUATION_PHRASES: &[&str] = &[
	"yes",
	"yes please",
	"more",
	"show more",
	"show me more",
	"give me more",
	"sure",
	"ok",
	"okay",
	"next",
];

const CONTINUATION_PROMPT: &str = "\nWould you like to see more?";
const CLOSING_STATEMENT: &str = "\nThose are all the recommendations I have for now.";
const EXHAUSTED_MESSAGE: &str = "There are no more products to show from your previous search.";

/// Position marker for incrementally disclosing one result list across
/// turns. A conversation holds at most one cursor; any non-continuation
/// query deletes it.
#[derive(Clone, Debug)]
pub struct PaginationCursor {
	pub results: Vec<ProductRecord>,
	pub next_index: usize,
}
impl PaginationCursor {
	pub fn new(results: Vec<ProductRecord>) -> Self {
		Self { results, next_index: 0 }
	}
}

/// Whether a query is an affirmative continuation of an open disclosure.
/// Matching is exact on the normalized text; anything longer is a new
/// query and goes through the full pipeline.
pub fn is_continuation(query: &str) -> bool {
	let normalized =
		query.trim().to_lowercase().trim_end_matches(['.', '!', '?', ',']).to_string();

	CONTINUATION_PHRASES.contains(&normalized.as_str())
}

/// Emits the next batch. Returns the formatted text and whether the cursor
/// is exhausted and should be dropped.
pub fn advance(cursor: &mut PaginationCursor) -> (String, bool) {
	if cursor.next_index >= cursor.results.len() {
		return (EXHAUSTED_MESSAGE.to_string(), true);
	}

	let end = (cursor.next_index + PAGE_SIZE).min(cursor.results.len());
	let mut text = product::format_listing(&cursor.results[cursor.next_index..end], cursor.next_index);

	cursor.next_index = end;

	if cursor.next_index < cursor.results.len() {
		text.push_str(CONTINUATION_PROMPT);

		(text, false)
	} else {
		text.push_str(CLOSING_STATEMENT);

		(text, true)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(i: usize) -> ProductRecord {
		ProductRecord {
			sku: format!("VSK10{i}"),
			title: format!("Piece {i}"),
			product_type: "bangle".to_string(),
			price: 900.0 + i as f64,
			tags: String::new(),
			description: "A bangle.".to_string(),
			stone: None,
			color: None,
			finish: None,
			weight: None,
			dimensions: None,
		}
	}

	#[test]
	fn seven_records_disclose_in_three_batches() {
		let mut cursor = PaginationCursor::new((0..7).map(record).collect());

		let (first, exhausted) = advance(&mut cursor);

		assert!(!exhausted);
		assert!(first.contains("1. Piece 0"));
		assert!(first.contains("3. Piece 2"));
		assert!(!first.contains("4. Piece 3"));
		assert!(first.ends_with("Would you like to see more?"));

		let (second, exhausted) = advance(&mut cursor);

		assert!(!exhausted);
		assert!(second.contains("4. Piece 3"));
		assert!(second.contains("6. Piece 5"));
		assert!(second.ends_with("Would you like to see more?"));

		let (third, exhausted) = advance(&mut cursor);

		assert!(exhausted);
		assert!(third.contains("7. Piece 6"));
		assert!(third.ends_with("Those are all the recommendations I have for now."));
	}

	#[test]
	fn drained_cursor_reports_exhaustion() {
		let mut cursor = PaginationCursor::new(vec![record(0)]);

		let (_, exhausted) = advance(&mut cursor);

		assert!(exhausted);

		let (text, exhausted) = advance(&mut cursor);

		assert!(exhausted);
		assert_eq!(text, EXHAUSTED_MESSAGE);
	}

	#[test]
	fn continuation_matching_is_exact_after_normalization() {
		assert!(is_continuation("Yes!"));
		assert!(is_continuation("  show me more  "));
		assert!(is_continuation("OK."));
		assert!(!is_continuation("show me more expensive ones"));
		assert!(!is_continuation("no thanks"));
	}
}
