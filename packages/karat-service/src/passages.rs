use karat_storage::Corpus;

use crate::Assistant;

impl Assistant {
	/// Top-k passage retrieval from one static corpus, concatenated into a
	/// single context blob. Failures degrade to an empty context so the
	/// composer can answer that the information is unavailable.
	pub(crate) async fn retrieve_passages(
		&self,
		conversation_id: &str,
		query: &str,
		corpus: Corpus,
	) -> String {
		let vector = match self.embed_query(query).await {
			Ok(vector) => vector,
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "embed",
					corpus = corpus.as_str(),
					"Query embedding failed; answering without context."
				);

				return String::new();
			},
		};

		match self.index.query_passages(corpus, vector, self.cfg.retrieval.passage_top_k).await {
			Ok(passages) => passages.join("\n\n"),
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "passage_retrieval",
					corpus = corpus.as_str(),
					"Passage retrieval failed; answering without context."
				);

				String::new()
			},
		}
	}
}
