use std::collections::HashSet;

use karat_domain::product;

use crate::acceptance::{harness, record, seed};

#[tokio::test]
async fn empty_retrieval_yields_the_fixed_apology() {
	let h = harness();

	// Nothing seeded: the composer must never be reached.
	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "tiara" }"#);

	let reply = h.assistant.respond("c1", "show me tiaras").await;

	assert_eq!(reply, "I'm sorry, I couldn't find any products that match your search.");
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn dead_end_search_resets_the_constraint_set() {
	let h = harness();

	seed(&h.index, record("VSK7001", "Gold Ring", "ring", 9_000.0));

	// "rings under 100" dead-ends on the price filter.
	h.chat.push("product_query");
	h.chat.push(r#"{ "category": "ring", "max_price": 100 }"#);

	let first = h.assistant.respond("c2", "rings under 100").await;

	assert!(first.contains("couldn't find any products"));

	// If the max_price filter survived the reset, this retrieval would
	// dead-end again. The no-op slot patch keeps the state empty.
	h.chat.push("product_query");
	h.chat.push("what do you have");
	h.chat.push(r#"{}"#);
	h.chat.push("The Gold Ring (SKU: VSK7001) at ₹9000.00 is a favorite.");

	let second = h.assistant.respond("c2", "ok just show me rings").await;

	assert!(second.contains("VSK7001"), "filters were not reset: {second}");
}

#[tokio::test]
async fn fabricated_identifiers_are_replaced_by_the_retrieved_listing() {
	let h = harness();

	seed(&h.index, record("VSK8001", "Gold Choker", "choker", 11_000.0));

	h.chat.push("product_query");
	h.chat.push(r#"{}"#);
	h.chat.push("Try the Gold Choker (SKU: VSK8001) or our popular FAKE99 pendant!");

	let reply = h.assistant.respond("c3", "chokers").await;

	assert!(!reply.contains("FAKE99"), "fabricated SKU leaked: {reply}");
	assert!(reply.contains("VSK8001"));
}

#[tokio::test]
async fn answer_identifiers_are_a_subset_of_evidence_identifiers() {
	// Sweep over generated evidence sets and answer shapes, honest and
	// fabricating; whatever comes back must only mention evidence SKUs.
	let answers = [
		"Our best piece is {first}.",
		"Compare {first} with {last} before deciding.",
		"You might also like ZZZ777 alongside {first}.",
		"Nothing beats XYZ12345 today!",
	];

	for set_size in 1..=4_usize {
		for answer in answers {
			let h = harness();
			let mut evidence_skus = HashSet::new();

			for i in 0..set_size {
				let sku = format!("VSK9{set_size}{i}0");

				seed(&h.index, record(&sku, &format!("Piece {i}"), "ring", 1_000.0 + i as f64));
				evidence_skus.insert(sku);
			}

			let first = format!("VSK9{set_size}00");
			let last = format!("VSK9{set_size}{}0", set_size - 1);
			let scripted = answer.replace("{first}", &first).replace("{last}", &last);

			h.chat.push("product_query");
			h.chat.push(r#"{}"#);
			h.chat.push(scripted);

			let reply = h.assistant.respond("c4", "rings please").await;
			let mentioned = product::extract_identifiers(&reply);

			for id in &mentioned {
				assert!(
					evidence_skus.contains(id),
					"reply mentioned {id} outside evidence {evidence_skus:?}: {reply}"
				);
			}
		}
	}
}
