//! Cupcake records, request payloads and the response envelopes of the collection API.

use crate::error::WorkflowError;
use core::{fmt, str::FromStr};
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Server-assigned cupcake identifier.
///
/// Rendered into the `data-identifier` attribute of each list item, which is how events resolve the record a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CupcakeId(pub u64);

impl fmt::Display for CupcakeId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

impl FromStr for CupcakeId {
	type Err = core::num::ParseIntError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		s.trim().parse().map(Self)
	}
}

/// One cupcake as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cupcake {
	pub id: CupcakeId,
	pub flavor: String,
	pub size: String,
	pub rating: f64,
	#[serde(default)]
	pub image: Option<String>,
}

/// Body of `POST /api/cupcakes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCupcake {
	pub flavor: String,
	pub size: String,
	pub rating: f64,
	/// Left out of the request when absent, so the server picks its default image.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl NewCupcake {
	/// Reads a create form submission.
	///
	/// Nothing is checked beyond the rating being a number.
	///
	/// # Errors
	///
	/// [`WorkflowError::InvalidField`] if the rating is missing or not numeric.
	pub fn from_fields(fields: &FormFields) -> Result<Self, WorkflowError> {
		Ok(Self {
			flavor: fields.get(field::FLAVOR).unwrap_or_default().to_owned(),
			size: fields.get(field::SIZE).unwrap_or_default().to_owned(),
			rating: parse_rating(fields.get(field::RATING).unwrap_or_default())?,
			image: fields.get(field::IMAGE).map(ToOwned::to_owned),
		})
	}
}

/// Body of `PATCH /api/cupcakes/:id`. Only the fields that are [`Some`] are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CupcakePatch {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub flavor: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub size: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rating: Option<f64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
}

impl CupcakePatch {
	/// Collects the fields the user actually filled in. Empty inputs are left out.
	///
	/// # Errors
	///
	/// [`WorkflowError::InvalidField`] if a rating was entered but isn't numeric.
	pub fn from_fields(fields: &FormFields) -> Result<Self, WorkflowError> {
		Ok(Self {
			flavor: fields.get(field::FLAVOR).map(ToOwned::to_owned),
			size: fields.get(field::SIZE).map(ToOwned::to_owned),
			rating: fields.get(field::RATING).map(parse_rating).transpose()?,
			image: fields.get(field::IMAGE).map(ToOwned::to_owned),
		})
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.flavor.is_none() && self.size.is_none() && self.rating.is_none() && self.image.is_none()
	}
}

fn parse_rating(value: &str) -> Result<f64, WorkflowError> {
	value
		.parse::<f64>()
		.ok()
		.filter(|rating| rating.is_finite())
		.ok_or_else(|| WorkflowError::InvalidField {
			field: field::RATING,
			value: value.to_owned(),
		})
}

/// Input names shared by the create and edit forms.
pub mod field {
	pub const FLAVOR: &str = "flavor";
	pub const SIZE: &str = "size";
	pub const RATING: &str = "rating";
	pub const IMAGE: &str = "image";

	pub const ALL: [&str; 4] = [FLAVOR, SIZE, RATING, IMAGE];
}

/// Values of a submitted form, by input name.
///
/// Values are stored trimmed, and empty values count as not provided.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(HashMap<String, String>);

impl FormFields {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, name: impl Into<String>, value: &str) {
		let value = value.trim();
		let name = name.into();
		if value.is_empty() {
			self.0.remove(&name);
		} else {
			self.0.insert(name, value.to_owned());
		}
	}

	#[must_use]
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<N: Into<String>, V: AsRef<str>> FromIterator<(N, V)> for FormFields {
	fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
		let mut fields = Self::new();
		for (name, value) in iter {
			fields.insert(name, value.as_ref());
		}
		fields
	}
}

/// `{ "cupcakes": [...] }`
#[derive(Debug, Deserialize)]
pub struct CupcakeList {
	pub cupcakes: Vec<Cupcake>,
}

/// `{ "cupcake": {...} }`
#[derive(Debug, Deserialize)]
pub struct CupcakeEnvelope {
	pub cupcake: Cupcake,
}

/// `{ "message": "..." }`
#[derive(Debug, Deserialize)]
pub struct Message {
	pub message: String,
}
