use karat_domain::{
	intent::Intent,
	slots::ProductSearchState,
	turn::ConversationTurn,
};
use karat_storage::Corpus;

use crate::{
	Assistant, compose,
	paginate::{self, PAGE_SIZE, PaginationCursor},
	session::Session,
};

impl Assistant {
	/// Processes one conversational turn. This is the single entry point
	/// shared by every transport, and it never fails: every stage degrades
	/// to a safe reply per its contract. Turns for the same conversation
	/// serialize on the per-conversation lock for the whole
	/// read-modify-write.
	pub async fn respond(&self, conversation_id: &str, query: &str) -> String {
		let lock = self.sessions.turn_lock(conversation_id);
		let _guard = lock.lock().await;
		let mut session = self.sessions.load(conversation_id);
		let reply = self.run_turn(conversation_id, query, &mut session).await;
		let reply = compose::normalize_whitespace(&reply);

		session.append_exchange(query, &reply, self.sessions.max_turns());
		self.sessions.store(conversation_id, session);

		reply
	}

	/// Current (unexpired) turn history for a conversation.
	pub fn history(&self, conversation_id: &str) -> Vec<ConversationTurn> {
		self.sessions.load(conversation_id).turns
	}

	async fn run_turn(
		&self,
		conversation_id: &str,
		query: &str,
		session: &mut Session,
	) -> String {
		if paginate::is_continuation(query)
			&& let Some(mut cursor) = session.cursor.take()
		{
			let (text, exhausted) = paginate::advance(&mut cursor);

			if !exhausted {
				session.cursor = Some(cursor);
			}

			return text;
		}

		// Any new query supersedes an open disclosure.
		session.cursor = None;

		let intent = self.classify_intent(conversation_id, query).await;

		tracing::info!(conversation_id, intent = intent.as_str(), "Classified turn intent.");

		match intent {
			Intent::ProductQuery => {
				self.handle_product_query(conversation_id, query, session).await
			},
			Intent::ReturnPolicy | Intent::ShippingPolicy | Intent::PrivacyPolicy => {
				let context =
					self.retrieve_passages(conversation_id, query, Corpus::Policy).await;

				self.compose_policy_answer(conversation_id, query, &session.turns, &context)
					.await
			},
			Intent::GeneralFaq => {
				let context = self.retrieve_passages(conversation_id, query, Corpus::Faq).await;

				self.compose_faq_answer(conversation_id, query, &session.turns, &context).await
			},
			Intent::Greeting => compose::canned_greeting(),
			Intent::Compliment => compose::canned_compliment_reply(),
			Intent::Other => compose::CLARIFYING_FALLBACK.to_string(),
		}
	}

	async fn handle_product_query(
		&self,
		conversation_id: &str,
		query: &str,
		session: &mut Session,
	) -> String {
		let search_query = if session.turns.is_empty() {
			query.to_string()
		} else {
			self.rewrite_query(conversation_id, query, &session.turns).await
		};

		self.update_search_state(conversation_id, query, &mut session.search).await;

		let records =
			self.retrieve_products(conversation_id, query, &search_query, &session.search).await;

		if records.is_empty() {
			// Dead-end search: the constraint set led nowhere, so the next
			// attempt starts clean.
			session.search = ProductSearchState::default();

			return compose::NO_RESULTS_MESSAGE.to_string();
		}
		if records.len() > PAGE_SIZE {
			let mut cursor = PaginationCursor::new(records);
			let (text, exhausted) = paginate::advance(&mut cursor);

			if !exhausted {
				session.cursor = Some(cursor);
			}

			return text;
		}

		self.compose_product_answer(conversation_id, query, &session.turns, &records).await
	}
}
