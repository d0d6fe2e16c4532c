use unicode_segmentation::UnicodeSegmentation;

#[derive(Clone, Debug)]
pub struct ChunkingConfig {
	pub max_chars: u32,
	pub overlap_chars: u32,
}

#[derive(Clone, Debug)]
pub struct Chunk {
	pub chunk_index: i32,
	pub start_offset: usize,
	pub end_offset: usize,
	pub text: String,
}

/// Splits text into chunks of at most `max_chars` characters, breaking on
/// sentence bounds and carrying `overlap_chars` of tail context into the
/// next chunk so meaning is preserved across chunk boundaries.
pub fn split_text(text: &str, cfg: &ChunkingConfig) -> Vec<Chunk> {
	let sentences: Vec<(usize, &str)> = text.split_sentence_bound_indices().collect();
	let mut chunks = Vec::new();
	let mut current = String::new();
	let mut current_start = 0_usize;
	let mut last_end = 0_usize;
	let mut chunk_index = 0_i32;

	for (idx, sentence) in sentences {
		let candidate_chars = current.chars().count() + sentence.chars().count();

		if candidate_chars as u32 > cfg.max_chars && !current.is_empty() {
			chunks.push(Chunk {
				chunk_index,
				start_offset: current_start,
				end_offset: last_end,
				text: current.clone(),
			});

			chunk_index += 1;

			let overlap = overlap_tail(&current, cfg.overlap_chars);

			current_start = last_end.saturating_sub(overlap.len());
			current = overlap;
		}
		if current.is_empty() {
			current_start = idx;
		}

		current.push_str(sentence);

		last_end = idx + sentence.len();
	}

	if !current.is_empty() {
		chunks.push(Chunk {
			chunk_index,
			start_offset: current_start,
			end_offset: last_end,
			text: current,
		});
	}

	chunks
}

fn overlap_tail(text: &str, overlap_chars: u32) -> String {
	if overlap_chars == 0 {
		return String::new();
	}

	let total = text.chars().count();
	let skip = total.saturating_sub(overlap_chars as usize);

	text.chars().skip(skip).collect()
}
