//! Failure taxonomy of the cupcake workflows.
//!
//! The [`Display`](core::fmt::Display) output of each error is the exact text shown to the user in the alert.

use crate::model::CupcakeId;
use core::fmt;
use serde::Deserialize;
use thiserror::Error;

/// A failed call to the collection API.
#[derive(Debug, Error)]
pub enum ApiError {
	/// The server answered with an error status.
	#[error(transparent)]
	Status(#[from] ServerError),

	/// The request went out, but no response came back.
	#[error("Did not receive a response from the server.")]
	NoResponse,

	/// The request could not be built or sent.
	#[error("Error occurred while setting up request.")]
	Setup(String),

	/// A success status with a body that isn't the expected envelope.
	#[error("Received an unexpected response from the server.")]
	Malformed(String),
}

impl From<reqwest::Error> for ApiError {
	fn from(error: reqwest::Error) -> Self {
		if error.is_builder() {
			Self::Setup(error.to_string())
		} else if error.is_decode() {
			Self::Malformed(error.to_string())
		} else {
			Self::NoResponse
		}
	}
}

/// Status, title and message of an error response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerError {
	pub status: u16,
	pub title: Option<String>,
	pub message: Option<String>,
}

impl std::error::Error for ServerError {}

impl fmt::Display for ServerError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "status: {}", self.status)?;
		for line in [&self.title, &self.message].into_iter().flatten() {
			write!(f, "\n{}", line)?;
		}
		Ok(())
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
	Detailed { error: ErrorDetail },
	Plain { message: String },
}

#[derive(Deserialize)]
struct ErrorDetail {
	status: Option<u16>,
	title: Option<String>,
	message: Option<String>,
}

impl ServerError {
	/// Interprets an error response body.
	///
	/// Understands `{"error": {"status", "title", "message"}}` and `{"message"}`.
	/// Any other body (an HTML error page, for example) falls back to the status line's reason phrase.
	#[must_use]
	pub fn from_body(status: u16, reason: Option<&str>, body: &str) -> Self {
		match serde_json::from_str::<ErrorBody>(body) {
			Ok(ErrorBody::Detailed { error }) => Self {
				status: error.status.unwrap_or(status),
				title: error.title,
				message: error.message,
			},
			Ok(ErrorBody::Plain { message }) => Self {
				status,
				title: reason.map(ToOwned::to_owned),
				message: Some(message),
			},
			Err(_) => Self {
				status,
				title: reason.map(ToOwned::to_owned),
				message: None,
			},
		}
	}
}

/// Why one workflow invocation stopped.
#[derive(Debug, Error)]
pub enum WorkflowError {
	#[error(transparent)]
	Api(#[from] ApiError),

	#[error("Invalid {field}: {value:?}")]
	InvalidField { field: &'static str, value: String },

	#[error("Nothing to update: every field was left empty.")]
	EmptyUpdate,

	#[error("Cupcake {0} is not in the list.")]
	UnknownCupcake(CupcakeId),

	/// The capability behind this workflow is switched off.
	#[error("{0} is not available.")]
	Unsupported(&'static str),
}

impl WorkflowError {
	/// The alert text without user-entered values, unless the `dangerous-logging` feature is enabled.
	#[must_use]
	pub fn log_message(&self) -> String {
		match self {
			Self::InvalidField { field, .. } if !cfg!(feature = "dangerous-logging") => format!("Invalid {field}."),
			_ => self.to_string(),
		}
	}
}
