use crate::acceptance::{harness, record, seed};

#[tokio::test]
async fn first_product_turn_composes_a_grounded_answer() {
	let h = harness();

	seed(&h.index, record("VSK1001", "Gold Necklace", "necklace", 9_500.0));
	seed(&h.index, record("VSK1002", "Silver Bangle", "bangle", 2_100.0));

	// intent, slot extraction, composition.
	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "necklace" }"#);
	h.chat.push("I found the Gold Necklace (SKU: VSK1001) at ₹9500.00, a lovely pick!");

	let reply = h.assistant.respond("c1", "show me gold necklaces").await;

	assert!(reply.contains("VSK1001"), "unexpected reply: {reply}");
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn follow_up_turn_rewrites_before_retrieval() {
	let h = harness();

	seed(&h.index, record("VSK2001", "Gold Necklace", "necklace", 9_500.0));

	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "necklace" }"#);
	h.chat.push("The Gold Necklace (SKU: VSK2001) is ₹9500.00.");

	let first = h.assistant.respond("c2", "show me gold necklaces").await;

	assert!(first.contains("VSK2001"));

	// Second turn has history: intent, rewrite, slot extraction, composition.
	h.chat.push("product_query");
	h.chat.push("gold necklaces under 10000");
	h.chat.push(r#"{ "max_price": 10000 }"#);
	h.chat.push("Still the Gold Necklace (SKU: VSK2001), and it fits your budget.");

	let second = h.assistant.respond("c2", "what about under 10000?").await;

	assert!(second.contains("VSK2001"), "unexpected reply: {second}");
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn price_filter_excludes_records_outside_the_range() {
	let h = harness();

	seed(&h.index, record("VSK3001", "Gold Necklace", "necklace", 22_000.0));
	seed(&h.index, record("VSK3002", "Gold Necklace Lite", "necklace", 4_000.0));

	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "necklace", "max_price": 5000 }"#);
	h.chat.push("The Gold Necklace Lite (SKU: VSK3002) is ₹4000.00.");

	let reply = h.assistant.respond("c3", "necklaces under 5000").await;

	assert!(reply.contains("VSK3002"), "unexpected reply: {reply}");
	assert!(!reply.contains("VSK3001"));
}

#[tokio::test]
async fn identifier_fast_path_returns_the_exact_record_first() {
	let h = harness();

	// Semantically the query matches the necklaces far better than the
	// plain band, but the identifier must win outright.
	seed(&h.index, record("VSK4001", "Gold Necklace Deluxe", "necklace", 18_000.0));
	seed(&h.index, record("VSK4002", "Gold Necklace Classic", "necklace", 12_000.0));
	seed(&h.index, record("RNG9001", "Plain Band", "ring", 800.0));

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);
	h.chat.push("That's the Plain Band (SKU: RNG9001), ₹800.00.");

	let reply = h.assistant.respond("c4", "do you have gold necklace RNG9001?").await;

	assert!(reply.contains("RNG9001"), "unexpected reply: {reply}");
	assert!(!reply.contains("VSK4001"));
}

#[tokio::test]
async fn policy_intent_answers_from_the_policy_corpus() {
	let h = harness();

	h.index.seed_passage(
		karat_storage::Corpus::Policy,
		karat_testkit::embed_text(crate::acceptance::DIM, "returns accepted within 30 days"),
		"Returns are accepted within 30 days of delivery.",
	);

	h.chat.push("return_policy");
	h.chat.push("You can return any piece within 30 days of delivery.");

	let reply = h.assistant.respond("c5", "can I return a ring?").await;

	assert!(reply.contains("30 days"), "unexpected reply: {reply}");
}

#[tokio::test]
async fn faq_intent_without_context_reports_no_information() {
	let h = harness();

	// Empty FAQ corpus: only the intent call reaches the model.
	h.chat.push("general_faq");

	let reply = h.assistant.respond("c6", "do you make custom engravings?").await;

	assert!(reply.contains("don't have that information"), "unexpected reply: {reply}");
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn greeting_gets_a_canned_reply_without_retrieval() {
	let h = harness();

	h.chat.push("greeting");

	let reply = h.assistant.respond("c7", "good morning!").await;

	assert!(!reply.is_empty());
	assert_eq!(h.chat.remaining(), 0);
	assert_eq!(h.index.product_count(), 0);
}
