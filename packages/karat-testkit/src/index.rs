use std::sync::{
	Mutex,
	atomic::{AtomicBool, Ordering},
};

use karat_domain::product::ProductRecord;
use karat_storage::{
	BoxFuture, Corpus, Error, PassagePoint, ProductFilter, ProductPoint, Result, VectorIndex,
};

/// In-memory stand-in for the vector index: cosine scoring over seeded
/// vectors, exact SKU lookup, and a switch to simulate an index outage.
#[derive(Default)]
pub struct MemoryIndex {
	products: Mutex<Vec<(Vec<f32>, ProductRecord)>>,
	policy_passages: Mutex<Vec<(Vec<f32>, String)>>,
	faq_passages: Mutex<Vec<(Vec<f32>, String)>>,
	failing: AtomicBool,
}
impl MemoryIndex {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seed_product(&self, vector: Vec<f32>, record: ProductRecord) {
		self.products.lock().unwrap_or_else(|err| err.into_inner()).push((vector, record));
	}

	pub fn seed_passage(&self, corpus: Corpus, vector: Vec<f32>, text: impl Into<String>) {
		self.passages(corpus)
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push((vector, text.into()));
	}

	/// While set, every query and lookup fails with an unavailable error.
	pub fn set_failing(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	pub fn product_count(&self) -> usize {
		self.products.lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	pub fn passage_count(&self, corpus: Corpus) -> usize {
		self.passages(corpus).lock().unwrap_or_else(|err| err.into_inner()).len()
	}

	fn passages(&self, corpus: Corpus) -> &Mutex<Vec<(Vec<f32>, String)>> {
		match corpus {
			Corpus::Policy => &self.policy_passages,
			Corpus::Faq => &self.faq_passages,
		}
	}

	fn check_available(&self) -> Result<()> {
		if self.failing.load(Ordering::SeqCst) {
			return Err(Error::Unavailable { message: "Index is unavailable.".to_string() });
		}

		Ok(())
	}
}

impl VectorIndex for MemoryIndex {
	fn upsert_products(&self, points: Vec<ProductPoint>) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.check_available()?;

			let mut products = self.products.lock().unwrap_or_else(|err| err.into_inner());

			for point in points {
				products.push((point.vector, point.record));
			}

			Ok(())
		})
	}

	fn upsert_passages(
		&self,
		corpus: Corpus,
		points: Vec<PassagePoint>,
	) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.check_available()?;

			let mut passages =
				self.passages(corpus).lock().unwrap_or_else(|err| err.into_inner());

			for point in points {
				passages.push((point.vector, point.text));
			}

			Ok(())
		})
	}

	fn query_products(
		&self,
		vector: Vec<f32>,
		filter: ProductFilter,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<ProductRecord>>> {
		Box::pin(async move {
			self.check_available()?;

			let products = self.products.lock().unwrap_or_else(|err| err.into_inner());
			let mut scored: Vec<(f32, ProductRecord)> = products
				.iter()
				.filter(|(_, record)| matches_filter(record, &filter))
				.map(|(stored, record)| (cosine(&vector, stored), record.clone()))
				.collect();

			scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
			scored.truncate(limit as usize);

			Ok(scored.into_iter().map(|(_, record)| record).collect())
		})
	}

	fn query_passages(
		&self,
		corpus: Corpus,
		vector: Vec<f32>,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(async move {
			self.check_available()?;

			let passages = self.passages(corpus).lock().unwrap_or_else(|err| err.into_inner());
			let mut scored: Vec<(f32, String)> = passages
				.iter()
				.map(|(stored, text)| (cosine(&vector, stored), text.clone()))
				.collect();

			scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
			scored.truncate(limit as usize);

			Ok(scored.into_iter().map(|(_, text)| text).collect())
		})
	}

	fn sku_lookup(&self, sku: String) -> BoxFuture<'_, Result<Option<ProductRecord>>> {
		Box::pin(async move {
			self.check_available()?;

			let products = self.products.lock().unwrap_or_else(|err| err.into_inner());

			Ok(products.iter().find(|(_, record)| record.sku == sku).map(|(_, r)| r.clone()))
		})
	}
}

fn matches_filter(record: &ProductRecord, filter: &ProductFilter) -> bool {
	if let Some(product_type) = &filter.product_type
		&& &record.product_type != product_type
	{
		return false;
	}
	if let Some(min) = filter.min_price
		&& record.price < min
	{
		return false;
	}
	if let Some(max) = filter.max_price
		&& record.price > max
	{
		return false;
	}

	true
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
	let norm_a: f32 = a.iter().map(|v| v * v).sum::<f32>().sqrt();
	let norm_b: f32 = b.iter().map(|v| v * v).sum::<f32>().sqrt();

	if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}
