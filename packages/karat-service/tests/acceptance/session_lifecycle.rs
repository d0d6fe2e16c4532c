use std::time::Duration;

use karat_testkit::test_config;

use crate::acceptance::{harness, harness_with};

#[tokio::test]
async fn idle_sessions_restart_with_empty_history() {
	let mut cfg = test_config();

	cfg.session.idle_timeout_secs = 1;

	let h = harness_with(cfg);

	h.chat.push("greeting");

	let _ = h.assistant.respond("c1", "hello").await;

	assert_eq!(h.assistant.history("c1").len(), 2);

	tokio::time::sleep(Duration::from_millis(1_200)).await;

	assert!(h.assistant.history("c1").is_empty());

	// The next turn starts fresh: history is empty, so no rewrite call is
	// scripted and none happens.
	h.chat.push("product_query");
	h.chat.push(r#"{}"#);

	let reply = h.assistant.respond("c1", "necklaces").await;

	assert!(reply.contains("couldn't find any products"), "unexpected reply: {reply}");
	assert_eq!(h.chat.remaining(), 0);
}

#[tokio::test]
async fn history_keeps_only_the_most_recent_pairs() {
	let mut cfg = test_config();

	cfg.session.max_history_pairs = 1;

	let h = harness_with(cfg);

	h.chat.push("greeting");

	let _ = h.assistant.respond("c2", "hello").await;

	h.chat.push("greeting");

	let _ = h.assistant.respond("c2", "hi again").await;

	let history = h.assistant.history("c2");

	assert_eq!(history.len(), 2);
	assert_eq!(history[0].content, "hi again");
}

#[tokio::test]
async fn concurrent_turns_for_one_conversation_never_lose_an_exchange() {
	let h = std::sync::Arc::new(harness());

	h.chat.push("greeting");
	h.chat.push("greeting");

	let first = {
		let h = h.clone();

		tokio::spawn(async move { h.assistant.respond("c3", "hello").await })
	};
	let second = {
		let h = h.clone();

		tokio::spawn(async move { h.assistant.respond("c3", "hey").await })
	};

	first.await.expect("first turn completes");
	second.await.expect("second turn completes");

	// Both read-modify-write cycles landed; neither overwrote the other.
	assert_eq!(h.assistant.history("c3").len(), 4);
}

#[tokio::test]
async fn conversations_are_isolated_from_each_other() {
	let h = harness();

	h.chat.push("greeting");

	let _ = h.assistant.respond("c4", "hello").await;

	assert!(h.assistant.history("c5").is_empty());
	assert_eq!(h.assistant.active_sessions(), 1);
}
