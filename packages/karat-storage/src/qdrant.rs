use std::{collections::HashMap, time::Duration};

use qdrant_client::{
	Qdrant,
	client::Payload,
	qdrant::{
		Condition, CreateCollectionBuilder, Distance, Filter, PointStruct, Query,
		QueryPointsBuilder, Range, ScrollPointsBuilder, UpsertPointsBuilder, Value,
		VectorParamsBuilder, value::Kind,
	},
};

use karat_domain::product::ProductRecord;

use crate::{
	BoxFuture, Result,
	models::{Corpus, PassagePoint, ProductFilter, ProductPoint},
};

// Index calls must never hang a turn; timeout is treated as a failure by
// the callers.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct QdrantIndex {
	pub client: Qdrant,
	pub products: String,
	pub policies: String,
	pub faqs: String,
	pub vector_dim: u32,
}
impl QdrantIndex {
	pub fn new(cfg: &karat_config::Qdrant) -> Result<Self> {
		let client = Qdrant::from_url(&cfg.url).timeout(REQUEST_TIMEOUT).build()?;

		Ok(Self {
			client,
			products: cfg.products_collection.clone(),
			policies: cfg.policies_collection.clone(),
			faqs: cfg.faqs_collection.clone(),
			vector_dim: cfg.vector_dim,
		})
	}

	pub async fn ensure_collections(&self) -> Result<()> {
		for collection in [&self.products, &self.policies, &self.faqs] {
			if self.client.collection_exists(collection.as_str()).await? {
				continue;
			}

			self.client
				.create_collection(
					CreateCollectionBuilder::new(collection.as_str()).vectors_config(
						VectorParamsBuilder::new(self.vector_dim as u64, Distance::Cosine),
					),
				)
				.await?;
		}

		Ok(())
	}

	fn corpus_collection(&self, corpus: Corpus) -> &str {
		match corpus {
			Corpus::Policy => &self.policies,
			Corpus::Faq => &self.faqs,
		}
	}
}

impl crate::VectorIndex for QdrantIndex {
	fn upsert_products(&self, points: Vec<ProductPoint>) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let points: Vec<PointStruct> = points
				.into_iter()
				.map(|point| {
					PointStruct::new(
						point.id.to_string(),
						point.vector,
						record_payload(&point.record),
					)
				})
				.collect();

			self.client
				.upsert_points(UpsertPointsBuilder::new(self.products.clone(), points).wait(true))
				.await?;

			Ok(())
		})
	}

	fn upsert_passages(
		&self,
		corpus: Corpus,
		points: Vec<PassagePoint>,
	) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let collection = self.corpus_collection(corpus).to_string();
			let points: Vec<PointStruct> = points
				.into_iter()
				.map(|point| {
					let mut payload = Payload::new();

					payload.insert("text", point.text);
					payload.insert("source", point.source);
					payload.insert("chunk_index", Value::from(point.chunk_index as i64));
					payload.insert("corpus", corpus.as_str().to_string());

					PointStruct::new(point.id.to_string(), point.vector, payload)
				})
				.collect();

			self.client
				.upsert_points(UpsertPointsBuilder::new(collection, points).wait(true))
				.await?;

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
			let mut search = QueryPointsBuilder::new(self.products.clone())
				.query(Query::new_nearest(vector))
				.limit(limit as u64)
				.with_payload(true);

			if let Some(filter) = product_filter(&filter) {
				search = search.filter(filter);
			}

			let response = self.client.query(search).await?;
			let mut records = Vec::with_capacity(response.result.len());

			for point in response.result {
				records.push(record_from_payload(&point.payload)?);
			}

			Ok(records)
		})
	}

	fn query_passages(
		&self,
		corpus: Corpus,
		vector: Vec<f32>,
		limit: u32,
	) -> BoxFuture<'_, Result<Vec<String>>> {
		Box::pin(async move {
			let collection = self.corpus_collection(corpus).to_string();
			let search = QueryPointsBuilder::new(collection)
				.query(Query::new_nearest(vector))
				.limit(limit as u64)
				.with_payload(true);
			let response = self.client.query(search).await?;
			let mut passages = Vec::with_capacity(response.result.len());

			for point in response.result {
				passages.push(payload_str(&point.payload, "text").ok_or_else(|| {
					crate::Error::Payload {
						message: "Passage point is missing text payload.".to_string(),
					}
				})?);
			}

			Ok(passages)
		})
	}

	fn sku_lookup(&self, sku: String) -> BoxFuture<'_, Result<Option<ProductRecord>>> {
		Box::pin(async move {
			let filter = Filter {
				must: vec![Condition::matches("sku", sku)],
				should: Vec::new(),
				must_not: Vec::new(),
				min_should: None,
			};
			let scroll = ScrollPointsBuilder::new(self.products.clone())
				.filter(filter)
				.limit(1)
				.with_payload(true);
			let response = self.client.scroll(scroll).await?;

			match response.result.first() {
				Some(point) => Ok(Some(record_from_payload(&point.payload)?)),
				None => Ok(None),
			}
		})
	}
}

fn product_filter(filter: &ProductFilter) -> Option<Filter> {
	let mut must = Vec::new();

	if let Some(product_type) = &filter.product_type {
		must.push(Condition::matches("product_type", product_type.clone()));
	}
	if filter.min_price.is_some() || filter.max_price.is_some() {
		must.push(Condition::range(
			"price",
			Range { lt: None, gt: None, gte: filter.min_price, lte: filter.max_price },
		));
	}

	if must.is_empty() {
		None
	} else {
		Some(Filter { must, should: Vec::new(), must_not: Vec::new(), min_should: None })
	}
}

fn record_payload(record: &ProductRecord) -> Payload {
	let mut payload = Payload::new();

	payload.insert("sku", record.sku.clone());
	payload.insert("title", record.title.clone());
	payload.insert("product_type", record.product_type.clone());
	payload.insert("price", Value::from(record.price));
	payload.insert("tags", record.tags.clone());
	payload.insert("description", record.description.clone());

	if let Some(stone) = &record.stone {
		payload.insert("stone", stone.clone());
	}
	if let Some(color) = &record.color {
		payload.insert("color", color.clone());
	}
	if let Some(finish) = &record.finish {
		payload.insert("finish", finish.clone());
	}
	if let Some(weight) = record.weight {
		payload.insert("weight", Value::from(weight));
	}
	if let Some(dimensions) = &record.dimensions {
		payload.insert("dimensions", dimensions.clone());
	}

	payload
}

fn record_from_payload(payload: &HashMap<String, Value>) -> Result<ProductRecord> {
	let required = |key: &str| {
		payload_str(payload, key).ok_or_else(|| crate::Error::Payload {
			message: format!("Product point is missing {key} payload."),
		})
	};
	let price = payload_f64(payload, "price").ok_or_else(|| crate::Error::Payload {
		message: "Product point is missing price payload.".to_string(),
	})?;

	Ok(ProductRecord {
		sku: required("sku")?,
		title: required("title")?,
		product_type: required("product_type")?,
		price,
		tags: payload_str(payload, "tags").unwrap_or_default(),
		description: payload_str(payload, "description").unwrap_or_default(),
		stone: payload_str(payload, "stone"),
		color: payload_str(payload, "color"),
		finish: payload_str(payload, "finish"),
		weight: payload_f64(payload, "weight"),
		dimensions: payload_str(payload, "dimensions"),
	})
}

fn payload_str(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::StringValue(text) => Some(text.clone()),
		_ => None,
	}
}

fn payload_f64(payload: &HashMap<String, Value>, key: &str) -> Option<f64> {
	match payload.get(key)?.kind.as_ref()? {
		Kind::DoubleValue(value) => Some(*value),
		Kind::IntegerValue(value) => Some(*value as f64),
		_ => None,
	}
}
