use karat_domain::{
	product::{self, ProductRecord},
	slots::ProductSearchState,
};
use karat_storage::ProductFilter;

use crate::Assistant;

impl Assistant {
	/// Hybrid product retrieval. An identifier-shaped token in the RAW
	/// query takes the exact-lookup fast path and, on a hit, short-circuits
	/// semantic ranking entirely; otherwise the (rewritten) query goes
	/// through metadata-filtered nearest-neighbor search. Index failures
	/// are treated as zero results, never surfaced.
	pub(crate) async fn retrieve_products(
		&self,
		conversation_id: &str,
		raw_query: &str,
		search_query: &str,
		state: &ProductSearchState,
	) -> Vec<ProductRecord> {
		if let Some(token) = product::identifier_token(raw_query) {
			match self.index.sku_lookup(token.clone()).await {
				Ok(Some(record)) => {
					tracing::info!(conversation_id, sku = %token, "Identifier fast path hit.");

					return vec![record];
				},
				Ok(None) => {},
				Err(err) => {
					tracing::warn!(
						conversation_id,
						error = %err,
						stage = "sku_lookup",
						"Exact identifier lookup failed; trying semantic search."
					);
				},
			}
		}

		let vector = match self.embed_query(search_query).await {
			Ok(vector) => vector,
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "embed",
					"Query embedding failed; treating as zero results."
				);

				return Vec::new();
			},
		};
		let filter = ProductFilter {
			product_type: state.category.clone(),
			min_price: state.min_price,
			max_price: state.max_price,
		};

		match self
			.index
			.query_products(vector, filter, self.cfg.retrieval.product_candidate_k)
			.await
		{
			Ok(mut records) => {
				records.truncate(self.cfg.retrieval.product_top_k as usize);

				records
			},
			Err(err) => {
				tracing::warn!(
					conversation_id,
					error = %err,
					stage = "product_retrieval",
					"Product retrieval failed; treating as zero results."
				);

				Vec::new()
			},
		}
	}
}
