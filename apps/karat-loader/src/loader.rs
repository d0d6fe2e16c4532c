use std::{fs, path::Path};

use uuid::Uuid;

use karat_chunking::ChunkingConfig;
use karat_config::EmbeddingProviderConfig;
use karat_providers::embedding;
use karat_storage::{Corpus, PassagePoint, QdrantIndex, VectorIndex};

use crate::error::{Error, Result};

const EMBED_BATCH_SIZE: usize = 32;

pub struct LoaderState {
	pub index: QdrantIndex,
	pub embedding: EmbeddingProviderConfig,
	pub chunking: ChunkingConfig,
	pub corpus: karat_config::Corpus,
}

struct PendingPassage {
	text: String,
	source: String,
	chunk_index: i32,
}

/// Loads both static corpora: policy documents are chunked with overlap,
/// FAQ rows become one passage each. Everything is embedded in batches and
/// upserted with its corpus metadata.
pub async fn run_loader(state: LoaderState) -> Result<()> {
	let policy_passages = load_policy_passages(&state.corpus, &state.chunking)?;
	let faq_passages = load_faq_passages(&state.corpus.faqs_csv)?;

	upsert_corpus(&state, Corpus::Policy, policy_passages).await?;
	upsert_corpus(&state, Corpus::Faq, faq_passages).await?;

	Ok(())
}

fn load_policy_passages(
	corpus: &karat_config::Corpus,
	chunking: &ChunkingConfig,
) -> Result<Vec<PendingPassage>> {
	let files = [
		("return", &corpus.return_policy),
		("shipping", &corpus.shipping_policy),
		("privacy", &corpus.privacy_policy),
	];
	let mut passages = Vec::new();

	for (label, path) in files {
		let content = fs::read_to_string(path)?;
		let chunks = karat_chunking::split_text(&content, chunking);

		tracing::info!(source = label, chunks = chunks.len(), "Chunked policy document.");

		for chunk in chunks {
			passages.push(PendingPassage {
				text: chunk.text,
				source: label.to_string(),
				chunk_index: chunk.chunk_index,
			});
		}
	}

	Ok(passages)
}

fn load_faq_passages(path: &Path) -> Result<Vec<PendingPassage>> {
	let mut reader = csv::Reader::from_path(path)?;
	let headers = reader.headers()?.clone();
	let question_column = headers
		.iter()
		.position(|h| h.eq_ignore_ascii_case("question"))
		.ok_or_else(|| Error::Message("FAQ CSV is missing a Question column.".to_string()))?;
	let answer_column = headers
		.iter()
		.position(|h| h.eq_ignore_ascii_case("answer"))
		.ok_or_else(|| Error::Message("FAQ CSV is missing an Answer column.".to_string()))?;
	let mut passages = Vec::new();

	for record in reader.records() {
		let record = record?;
		let question = record.get(question_column).unwrap_or_default().trim();
		let answer = record.get(answer_column).unwrap_or_default().trim();

		if question.is_empty() || answer.is_empty() {
			continue;
		}

		passages.push(PendingPassage {
			text: format!("Question: {question}\nAnswer: {answer}"),
			source: "faqs".to_string(),
			chunk_index: passages.len() as i32,
		});
	}

	tracing::info!(rows = passages.len(), "Loaded FAQ passages.");

	Ok(passages)
}

async fn upsert_corpus(
	state: &LoaderState,
	corpus: Corpus,
	passages: Vec<PendingPassage>,
) -> Result<()> {
	let total = passages.len();

	for batch in passages.chunks(EMBED_BATCH_SIZE) {
		let texts: Vec<String> = batch.iter().map(|passage| passage.text.clone()).collect();
		let vectors = embedding::embed(&state.embedding, &texts)
			.await
			.map_err(|err| Error::Message(format!("Embedding call failed: {err}.")))?;

		if vectors.len() != batch.len() {
			return Err(Error::Message(
				"Embedding provider returned a mismatched vector count.".to_string(),
			));
		}

		let points: Vec<PassagePoint> = batch
			.iter()
			.zip(vectors)
			.map(|(passage, vector)| PassagePoint {
				id: Uuid::new_v4(),
				vector,
				text: passage.text.clone(),
				source: passage.source.clone(),
				chunk_index: passage.chunk_index,
			})
			.collect();

		state.index.upsert_passages(corpus, points).await?;
	}

	tracing::info!(corpus = corpus.as_str(), count = total, "Upserted corpus passages.");

	Ok(())
}
