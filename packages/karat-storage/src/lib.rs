pub mod models;
pub mod qdrant;

pub use models::{Corpus, PassagePoint, ProductFilter, ProductPoint};
pub use qdrant::QdrantIndex;

use std::{future::Future, pin::Pin};

use karat_domain::product::ProductRecord;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Qdrant(#[from] Box<qdrant_client::QdrantError>),
	#[error("{message}")]
	Payload { message: String },
	#[error("{message}")]
	Unavailable { message: String },
}
impl From<qdrant_client::QdrantError> for Error {
	fn from(err: qdrant_client::QdrantError) -> Self {
		Self::Qdrant(Box::new(err))
	}
}

/// The vector-index capability the pipeline consumes. Production wires
/// `QdrantIndex`; tests substitute an in-memory implementation.
pub trait VectorIndex: Send + Sync {
	fn upsert_products(&self, points: Vec<ProductPoint>) -> BoxFuture<'_, Result<()>>;

	fn upsert_passages(
		&self,
		corpus: Corpus,
		points: Vec<PassagePoint>,
	) -> BoxFuture<'_, Result<()>>;

	/// Nearest-neighbor search over the product collection, restricted by
	/// the metadata filter. Results come back in the index's ranking order.
	fn query_products(
		&self,
		vector: Vec<f32>,
		filter: ProductFilter,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<ProductRecord>>>;

	fn query_passages(
		&self,
		corpus: Corpus,
		vector: Vec<f32>,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<String>>>;

	/// Exact payload-equality lookup by identifier; no vector involved.
	fn sku_lookup(&self, sku: String) -> BoxFuture<'_, Result<Option<ProductRecord>>>;
}
