use crate::acceptance::{harness, record, seed};

#[tokio::test]
async fn classification_failure_falls_back_to_rules() {
	let h = harness();

	h.index.seed_passage(
		karat_storage::Corpus::Policy,
		karat_testkit::embed_text(crate::acceptance::DIM, "refunds processed in 5 days"),
		"Refunds are processed within 5 business days.",
	);

	// The model call dies; "refund" routes through the rule classifier.
	h.chat.push_failure("connection timed out");
	h.chat.push("Refunds land within 5 business days.");

	let reply = h.assistant.respond("c1", "how do refunds work?").await;

	assert!(reply.contains("5 business days"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn unknown_label_falls_back_to_rules() {
	let h = harness();

	h.chat.push("chitchat_about_jewels");

	let reply = h.assistant.respond("c2", "hello!").await;

	// Rules classify "hello" as a greeting; the canned pool answers.
	assert!(!reply.is_empty());
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn rewrite_failure_retrieves_with_the_original_query() {
	let h = harness();

	seed(&h.index, record("VSK6001", "Gold Necklace", "necklace", 9_000.0));

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);
	h.chat.push("Here's the Gold Necklace (SKU: VSK6001).");

	let first = h.assistant.respond("c3", "gold necklaces").await;

	assert!(first.contains("VSK6001"));

	h.chat.push("product_query");
	h.chat.push_failure("rewrite model unavailable");
	h.chat.push(r#"{}"#);
	h.chat.push("The Gold Necklace (SKU: VSK6001) again!");

	let second = h.assistant.respond("c3", "gold necklaces again").await;

	assert!(second.contains("VSK6001"), "unexpected reply: {second}");
}

#[tokio::test]
async fn malformed_slot_output_is_a_noop_update() {
	let h = harness();

	seed(&h.index, record("VSK6101", "Emerald Ring", "ring", 7_000.0));

	h.chat.push("product_query");
	h.chat.push("I set the category to ring for you!");
	h.chat.push("The Emerald Ring (SKU: VSK6101) is ₹7000.00.");

	// Prose instead of JSON: the update is dropped, the turn still answers.
	let reply = h.assistant.respond("c4", "emerald rings").await;

	assert!(reply.contains("VSK6101"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn generation_failure_surfaces_the_generic_apology() {
	let h = harness();

	seed(&h.index, record("VSK6201", "Ruby Pendant", "pendant", 5_500.0));

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);
	h.chat.push_failure("model overloaded");

	let reply = h.assistant.respond("c5", "ruby pendants").await;

	assert!(reply.contains("unexpected issue"), "unexpected reply: {reply}");
	assert!(!reply.contains("overloaded"), "provider error text must not leak: {reply}");
}

#[tokio::test]
async fn index_outage_reads_as_zero_results() {
	let h = harness();

	seed(&h.index, record("VSK6301", "Opal Ring", "ring", 3_200.0));
	h.index.set_failing(true);

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);

	let reply = h.assistant.respond("c6", "opal rings").await;

	assert!(
		reply.contains("couldn't find any products"),
		"unexpected reply: {reply}"
	);
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn embedding_outage_reads_as_zero_results() {
	let h = harness();

	seed(&h.index, record("VSK6401", "Pearl Drop", "earring", 2_800.0));
	h.embedding.set_failing(true);

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);

	let reply = h.assistant.respond("c7", "pearl earrings").await;

	assert!(
		reply.contains("couldn't find any products"),
		"unexpected reply: {reply}"
	);
}
