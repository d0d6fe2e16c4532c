use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The running structured search constraints for one conversation. A field
/// is present only when the customer supplied or implied it; clearing a
/// field makes it absent, never an empty string.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct ProductSearchState {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub category: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub subcategory: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stone: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub finish: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub min_price: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_price: Option<f64>,
}
impl ProductSearchState {
	pub fn is_empty(&self) -> bool {
		self.category.is_none()
			&& self.subcategory.is_none()
			&& self.stone.is_none()
			&& self.color.is_none()
			&& self.finish.is_none()
			&& self.min_price.is_none()
			&& self.max_price.is_none()
	}

	/// Shallow per-key merge: `Set` overwrites, `Clear` removes, `Keep`
	/// leaves the field untouched. Applying the same patch twice is a no-op.
	pub fn apply(&mut self, patch: &SlotPatch) {
		patch.category.apply(&mut self.category);
		patch.subcategory.apply(&mut self.subcategory);
		patch.stone.apply(&mut self.stone);
		patch.color.apply(&mut self.color);
		patch.finish.apply(&mut self.finish);
		patch.min_price.apply(&mut self.min_price);
		patch.max_price.apply(&mut self.max_price);
	}
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum SlotValue<T> {
	#[default]
	Keep,
	Clear,
	Set(T),
}
impl<T: Clone> SlotValue<T> {
	fn apply(&self, field: &mut Option<T>) {
		match self {
			Self::Keep => {},
			Self::Clear => *field = None,
			Self::Set(value) => *field = Some(value.clone()),
		}
	}
}

/// A structured update extracted from one user message. Keys absent from
/// the model's JSON object stay `Keep`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlotPatch {
	pub category: SlotValue<String>,
	pub subcategory: SlotValue<String>,
	pub stone: SlotValue<String>,
	pub color: SlotValue<String>,
	pub finish: SlotValue<String>,
	pub min_price: SlotValue<f64>,
	pub max_price: SlotValue<f64>,
}

#[derive(Debug)]
pub struct SlotParseError {
	pub message: String,
}
impl Display for SlotParseError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.message)
	}
}
impl std::error::Error for SlotParseError {}

const TEXT_KEYS: &[&str] = &["category", "subcategory", "stone", "color", "finish"];
const PRICE_KEYS: &[&str] = &["min_price", "max_price"];

impl SlotPatch {
	/// Strict parse of the extractor's JSON object. Only the seven
	/// recognized keys are read; unknown keys are ignored; an invalid value
	/// for a recognized key fails the whole patch so the caller can treat
	/// the update as a no-op.
	pub fn from_json(value: &Value) -> Result<Self, SlotParseError> {
		let object = value.as_object().ok_or_else(|| SlotParseError {
			message: "Slot update must be a JSON object.".to_string(),
		})?;
		let mut patch = Self::default();

		for key in TEXT_KEYS {
			let Some(raw) = object.get(*key) else {
				continue;
			};
			let parsed = parse_text_value(key, raw)?;

			match *key {
				"category" => patch.category = parsed,
				"subcategory" => patch.subcategory = parsed,
				"stone" => patch.stone = parsed,
				"color" => patch.color = parsed,
				"finish" => patch.finish = parsed,
				_ => {},
			}
		}
		for key in PRICE_KEYS {
			let Some(raw) = object.get(*key) else {
				continue;
			};
			let parsed = parse_price_value(key, raw)?;

			match *key {
				"min_price" => patch.min_price = parsed,
				"max_price" => patch.max_price = parsed,
				_ => {},
			}
		}

		Ok(patch)
	}

	pub fn is_noop(&self) -> bool {
		self == &Self::default()
	}
}

fn parse_text_value(key: &str, raw: &Value) -> Result<SlotValue<String>, SlotParseError> {
	match raw {
		Value::Null => Ok(SlotValue::Clear),
		Value::String(text) => {
			let trimmed = text.trim();

			// Extractors occasionally emit "" for a cleared constraint; an
			// empty string must never survive as a present value.
			if trimmed.is_empty() {
				Ok(SlotValue::Clear)
			} else {
				Ok(SlotValue::Set(trimmed.to_lowercase()))
			}
		},
		_ => Err(SlotParseError { message: format!("Slot {key} must be a string or null.") }),
	}
}

fn parse_price_value(key: &str, raw: &Value) -> Result<SlotValue<f64>, SlotParseError> {
	let value = match raw {
		Value::Null => return Ok(SlotValue::Clear),
		Value::Number(number) => number.as_f64(),
		Value::String(text) => {
			let trimmed = text.trim();

			if trimmed.is_empty() {
				return Ok(SlotValue::Clear);
			}

			trimmed.parse::<f64>().ok()
		},
		_ => None,
	};
	let Some(value) = value else {
		return Err(SlotParseError { message: format!("Slot {key} must be a number or null.") });
	};

	if !value.is_finite() || value < 0.0 {
		return Err(SlotParseError {
			message: format!("Slot {key} must be a non-negative number."),
		});
	}

	Ok(SlotValue::Set(value))
}
