use std::{
	collections::HashMap,
	sync::{Arc, Mutex as StdMutex},
	time::{Duration, Instant},
};

use tokio::sync::Mutex;

use karat_domain::{slots::ProductSearchState, turn::ConversationTurn};

use crate::paginate::PaginationCursor;

/// Everything the pipeline remembers about one conversation: bounded turn
/// history, the running search constraints, and an in-progress pagination
/// cursor. All three share one idle lifetime; expiry discards the entry
/// whole.
#[derive(Clone, Debug)]
pub struct Session {
	pub turns: Vec<ConversationTurn>,
	pub search: ProductSearchState,
	pub cursor: Option<PaginationCursor>,
	last_activity: Instant,
}
impl Session {
	fn new() -> Self {
		Self {
			turns: Vec::new(),
			search: ProductSearchState::default(),
			cursor: None,
			last_activity: Instant::now(),
		}
	}

	fn is_expired(&self, idle_timeout: Duration) -> bool {
		self.last_activity.elapsed() > idle_timeout
	}

	pub(crate) fn append_exchange(&mut self, query: &str, reply: &str, max_turns: usize) {
		self.turns.push(ConversationTurn::user(query));
		self.turns.push(ConversationTurn::assistant(reply));

		if self.turns.len() > max_turns {
			let excess = self.turns.len() - max_turns;

			self.turns.drain(..excess);
		}

		self.last_activity = Instant::now();
	}
}

/// In-memory per-conversation store. Eviction is lazy: the read that
/// observes an expired entry prunes it, there is no background sweep.
/// Turns for the same conversation id serialize on a per-key async lock so
/// concurrent requests never interleave a read-modify-write.
pub struct SessionStore {
	idle_timeout: Duration,
	max_turns: usize,
	entries: StdMutex<HashMap<String, Session>>,
	turn_locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}
impl SessionStore {
	pub fn new(idle_timeout: Duration, max_history_pairs: u32) -> Self {
		Self {
			idle_timeout,
			max_turns: max_history_pairs as usize * 2,
			entries: StdMutex::new(HashMap::new()),
			turn_locks: StdMutex::new(HashMap::new()),
		}
	}

	pub(crate) fn turn_lock(&self, conversation_id: &str) -> Arc<Mutex<()>> {
		let mut locks = self.turn_locks.lock().unwrap_or_else(|err| err.into_inner());

		locks.entry(conversation_id.to_string()).or_default().clone()
	}

	/// Loads a snapshot of the conversation, pruning it first when it has
	/// been idle past the timeout. A missing or pruned entry comes back
	/// fresh.
	pub(crate) fn load(&self, conversation_id: &str) -> Session {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if entries.get(conversation_id).is_some_and(|session| session.is_expired(self.idle_timeout))
		{
			entries.remove(conversation_id);
		}

		entries.get(conversation_id).cloned().unwrap_or_else(Session::new)
	}

	pub(crate) fn store(&self, conversation_id: &str, session: Session) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.insert(conversation_id.to_string(), session);
	}

	pub(crate) fn max_turns(&self) -> usize {
		self.max_turns
	}

	pub fn active_sessions(&self) -> usize {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.values().filter(|session| !session.is_expired(self.idle_timeout)).count()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expired_session_is_pruned_on_load() {
		let store = SessionStore::new(Duration::from_secs(60), 10);
		let mut session = Session::new();

		session.append_exchange("hello", "Hi!", store.max_turns());
		session.last_activity = Instant::now() - Duration::from_secs(61);

		store.store("c1", session);

		assert_eq!(store.active_sessions(), 0);
		assert!(store.load("c1").turns.is_empty());
	}

	#[test]
	fn history_is_bounded_to_last_pairs() {
		let store = SessionStore::new(Duration::from_secs(60), 2);
		let mut session = Session::new();

		for i in 0..5 {
			session.append_exchange(&format!("q{i}"), &format!("a{i}"), store.max_turns());
		}

		assert_eq!(session.turns.len(), 4);
		assert_eq!(session.turns[0].content, "q3");
	}

	#[test]
	fn slots_and_cursor_share_the_session_lifetime() {
		let store = SessionStore::new(Duration::from_secs(60), 10);
		let mut session = Session::new();

		session.search.color = Some("green".to_string());
		session.append_exchange("green ones", "Here you go.", store.max_turns());
		session.last_activity = Instant::now() - Duration::from_secs(61);

		store.store("c1", session);

		let reloaded = store.load("c1");

		assert!(reloaded.search.is_empty());
		assert!(reloaded.cursor.is_none());
	}
}
