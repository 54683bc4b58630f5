//! The REST collection the list is kept in sync with.

use crate::{
	error::{ApiError, ServerError},
	model::{Cupcake, CupcakeEnvelope, CupcakeId, CupcakeList, CupcakePatch, Message, NewCupcake},
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};
use url::Url;

/// Remote cupcake collection.
///
/// Futures aren't required to be [`Send`], since in the browser they are driven on the page's only thread.
#[async_trait(?Send)]
pub trait CupcakeApi {
	/// `GET /api/cupcakes?flavor=…`. An empty or absent filter lists everything.
	async fn list(&self, flavor: Option<&str>) -> Result<Vec<Cupcake>, ApiError>;

	/// `GET /api/cupcakes/:id`
	async fn get(&self, id: CupcakeId) -> Result<Cupcake, ApiError>;

	/// `POST /api/cupcakes`
	async fn create(&self, cupcake: &NewCupcake) -> Result<Cupcake, ApiError>;

	/// `PATCH /api/cupcakes/:id`
	async fn update(&self, id: CupcakeId, patch: &CupcakePatch) -> Result<Cupcake, ApiError>;

	/// `DELETE /api/cupcakes/:id`, resolving to the server's confirmation message.
	async fn delete(&self, id: CupcakeId) -> Result<String, ApiError>;
}

/// URLs of the collection and its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
	collection: Url,
}

impl Endpoints {
	/// Resolves `base` (absolute, or relative such as `/api/cupcakes`) against `origin`.
	///
	/// # Errors
	///
	/// [`ApiError::Setup`] if the result isn't a valid URL.
	pub fn new(origin: Option<&str>, base: &str) -> Result<Self, ApiError> {
		let collection = match origin {
			Some(origin) => Url::parse(origin).and_then(|origin| origin.join(base)),
			None => Url::parse(base),
		}
		.map_err(|e| ApiError::Setup(format!("invalid collection URL {:?}: {}", base, e)))?;
		Ok(Self { collection })
	}

	#[must_use]
	pub fn collection(&self, flavor: Option<&str>) -> Url {
		let mut url = self.collection.clone();
		if let Some(flavor) = flavor.filter(|flavor| !flavor.is_empty()) {
			url.query_pairs_mut().append_pair("flavor", flavor);
		}
		url
	}

	#[must_use]
	pub fn item(&self, id: CupcakeId) -> Url {
		let mut url = self.collection.clone();
		// Only cannot-be-a-base URLs lack path segments.
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(&id.to_string());
		}
		url
	}
}

/// [`CupcakeApi`] over HTTP. On `wasm32` requests go through the browser's `fetch`.
#[derive(Debug, Clone)]
pub struct HttpApi {
	client: reqwest::Client,
	endpoints: Endpoints,
}

impl HttpApi {
	#[must_use]
	pub fn new(endpoints: Endpoints) -> Self {
		Self {
			client: reqwest::Client::new(),
			endpoints,
		}
	}

	#[must_use]
	pub fn endpoints(&self) -> &Endpoints {
		&self.endpoints
	}
}

#[async_trait(?Send)]
impl CupcakeApi for HttpApi {
	#[instrument(skip(self, flavor))]
	async fn list(&self, flavor: Option<&str>) -> Result<Vec<Cupcake>, ApiError> {
		if cfg!(feature = "dangerous-logging") {
			trace!(?flavor, "Requesting cupcakes.");
		}
		let CupcakeList { cupcakes } = send(self.client.get(self.endpoints.collection(flavor))).await?;
		debug!("Received {} cupcake(s).", cupcakes.len());
		Ok(cupcakes)
	}

	#[instrument(skip(self))]
	async fn get(&self, id: CupcakeId) -> Result<Cupcake, ApiError> {
		let CupcakeEnvelope { cupcake } = send(self.client.get(self.endpoints.item(id))).await?;
		Ok(cupcake)
	}

	#[instrument(skip(self, cupcake))]
	async fn create(&self, cupcake: &NewCupcake) -> Result<Cupcake, ApiError> {
		let CupcakeEnvelope { cupcake } = send(self.client.post(self.endpoints.collection(None)).json(cupcake)).await?;
		debug!("Created cupcake {}.", cupcake.id);
		Ok(cupcake)
	}

	#[instrument(skip(self, patch))]
	async fn update(&self, id: CupcakeId, patch: &CupcakePatch) -> Result<Cupcake, ApiError> {
		let CupcakeEnvelope { cupcake } = send(self.client.patch(self.endpoints.item(id)).json(patch)).await?;
		Ok(cupcake)
	}

	#[instrument(skip(self))]
	async fn delete(&self, id: CupcakeId) -> Result<String, ApiError> {
		let Message { message } = send(self.client.delete(self.endpoints.item(id))).await?;
		Ok(message)
	}
}

async fn send<T: DeserializeOwned>(request: reqwest::RequestBuilder) -> Result<T, ApiError> {
	let response = request.send().await?;
	let status = response.status();
	if !status.is_success() {
		// An unreadable error body still carries its status.
		let body = response.text().await.unwrap_or_default();
		return Err(ServerError::from_body(status.as_u16(), status.canonical_reason(), &body).into());
	}
	let body = response.text().await?;
	serde_json::from_str(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}
