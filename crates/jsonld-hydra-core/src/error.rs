//! Error and problem types shared by every rendering stage.

use std::fmt;

use http::StatusCode;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;

/// Errors raised while building or rendering JSON-LD resources.
///
/// Every variant is terminal for the render call that produced it; nothing in
/// the rendering pipeline retries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
	/// Malformed configuration or input: bad property specs, page values,
	/// option types, URLs or hydrator names.
	#[error("invalid argument: {0}")]
	InvalidArgument(String),

	/// A property was used in a way its protocol forbids, or was found
	/// malformed or incomplete during extraction.
	#[error("{0}")]
	Domain(String),

	/// An entity was constructed from a payload that is not a record or object.
	#[error("invalid entity payload: {0}")]
	InvalidEntity(String),

	/// A collection was constructed from a payload that cannot be iterated.
	#[error("invalid collection payload: {0}")]
	InvalidCollection(String),

	/// The same object was reached twice while no depth limit was in force.
	#[error(
		"Circular reference detected in '{class}'. Either set a 'max_depth' metadata attribute or remove the reference"
	)]
	CircularReference {
		/// Type name of the object that was visited twice.
		class: String,
	},

	/// A resource could not be assembled from its metadata.
	#[error("{0}")]
	Runtime(String),

	/// The URL reverser could not build a path for a route.
	#[error("unable to build a URL for route '{route}': {message}")]
	UrlReversal {
		/// Route name that failed to resolve.
		route: String,
		/// Reason reported by the reverser.
		message: String,
	},
}

/// Result type used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Default `type` URI for problem values that do not declare one.
pub const PROBLEM_TYPE_URI: &str = "http://www.w3.org/Protocols/rfc2616/rfc2616-sec10.html";

/// A request-level failure returned as a value instead of an error.
///
/// Callers translate it into a transport response before doing anything else
/// with the would-be document.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use jsonld_hydra_core::ApiProblem;
///
/// let problem = ApiProblem::new(StatusCode::CONFLICT, "Invalid page provided");
/// assert_eq!(problem.status(), StatusCode::CONFLICT);
/// assert_eq!(problem.title(), "Conflict");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiProblem {
	status: StatusCode,
	detail: String,
}

impl ApiProblem {
	pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
		Self {
			status,
			detail: detail.into(),
		}
	}

	pub fn status(&self) -> StatusCode {
		self.status
	}

	pub fn detail(&self) -> &str {
		&self.detail
	}

	/// Reason phrase of the status code.
	pub fn title(&self) -> &'static str {
		self.status.canonical_reason().unwrap_or("Unknown")
	}
}

impl fmt::Display for ApiProblem {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {}: {}", self.status.as_u16(), self.title(), self.detail)
	}
}

impl Serialize for ApiProblem {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		let mut state = serializer.serialize_struct("ApiProblem", 4)?;
		state.serialize_field("type", PROBLEM_TYPE_URI)?;
		state.serialize_field("title", self.title())?;
		state.serialize_field("status", &self.status.as_u16())?;
		state.serialize_field("detail", &self.detail)?;
		state.end()
	}
}
