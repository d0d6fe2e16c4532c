use karat_domain::product::ProductRecord;

/// Which static passage corpus a query or upsert targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Corpus {
	Policy,
	Faq,
}
impl Corpus {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Policy => "policy",
			Self::Faq => "faq",
		}
	}
}

/// Metadata constraints applied inside the index before ranking. Only
/// bounds that are present become conditions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
	pub product_type: Option<String>,
	pub min_price: Option<f64>,
	pub max_price: Option<f64>,
}
impl ProductFilter {
	pub fn is_empty(&self) -> bool {
		self.product_type.is_none() && self.min_price.is_none() && self.max_price.is_none()
	}
}

#[derive(Clone, Debug)]
pub struct ProductPoint {
	pub id: uuid::Uuid,
	pub vector: Vec<f32>,
	pub record: ProductRecord,
}

#[derive(Clone, Debug)]
pub struct PassagePoint {
	pub id: uuid::Uuid,
	pub vector: Vec<f32>,
	pub text: String,
	pub source: String,
	pub chunk_index: i32,
}
