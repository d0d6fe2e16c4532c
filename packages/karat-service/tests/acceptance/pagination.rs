use crate::acceptance::{harness, record, seed};

#[tokio::test]
async fn long_result_sets_disclose_in_batches_across_turns() {
	let h = harness();

	for i in 0..5 {
		seed(&h.index, record(&format!("VSK500{i}"), &format!("Gold Ring {i}"), "ring", 3_000.0));
	}

	// First turn runs the pipeline; the listing exceeds one batch, so the
	// reply is the first disclosure and no composition call happens.
	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "ring" }"#);

	let first = h.assistant.respond("c1", "show me gold rings").await;

	assert!(first.contains("1."), "unexpected reply: {first}");
	assert!(first.contains("3."));
	assert!(!first.contains("4."));
	assert!(first.contains("Would you like to see more?"));
	assert_eq!(h.chat.remaining(), 0);

	// Continuation turns bypass the pipeline entirely.
	let second = h.assistant.respond("c1", "more").await;

	assert!(second.contains("4."), "unexpected reply: {second}");
	assert!(second.contains("5."));
	assert!(second.contains("all the recommendations"));
	assert_eq!(h.chat.remaining(), 0);

	// The cursor is gone, so another "more" is a fresh query again.
	h.chat.push("other");

	let third = h.assistant.respond("c1", "more").await;

	assert!(third.contains("not sure how to help"), "unexpected reply: {third}");
}

#[tokio::test]
async fn any_new_query_supersedes_an_open_cursor() {
	let h = harness();

	for i in 0..4 {
		seed(&h.index, record(&format!("VSK510{i}"), &format!("Bangle {i}"), "bangle", 1_500.0));
	}

	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "bangle" }"#);

	let first = h.assistant.respond("c2", "bangles please").await;

	assert!(first.contains("Would you like to see more?"), "unexpected reply: {first}");

	// A non-continuation query drops the cursor before normal processing.
	h.chat.push("greeting");

	let _ = h.assistant.respond("c2", "hello there").await;

	h.chat.push("other");

	let after = h.assistant.respond("c2", "more").await;

	assert!(
		after.contains("not sure how to help"),
		"cursor should have been dropped: {after}"
	);
}
