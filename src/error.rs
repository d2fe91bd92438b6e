//! Client-level error types shared by the signer, the request pipeline, and resource helpers.

// self
use crate::{_prelude::*, envelope::null_as_default};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem detected before any network activity.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS, deadline).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Upstream response could not be interpreted.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Bearer token could not be signed.
	#[error("Can't sign bearer token.")]
	Signing {
		/// Underlying JWT encoding failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},

	/// Server rejected the bearer token as invalid or expired.
	#[error("invalid access token")]
	InvalidAccessToken,
	/// Structured business error reported by the API.
	#[error(transparent)]
	Api(#[from] ApiError),
}

/// Configuration failures raised while building a [`crate::Client`].
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// No private key material was supplied.
	#[error("no private key provided")]
	NoPrivateKey,
	/// Private key material is not a usable RSA signing key.
	#[error("Private key is not a valid PEM-encoded RSA key.")]
	InvalidPrivateKey {
		/// Underlying key parsing or probe-signing failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
	/// Base URL cannot carry a path.
	#[error("Base URL `{url}` cannot be used as an API base.")]
	InvalidBaseUrl {
		/// Offending URL.
		url: String,
	},
	/// Outbound request could not be constructed.
	#[error("HTTP request could not be constructed.")]
	RequestBuild {
		/// Underlying request builder failure.
		#[source]
		source: ReqwestError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, deadlines).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request deadline was reached while the call was in flight.
	#[error("Request deadline exceeded while calling the API.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
	/// The request deadline had already elapsed; nothing was sent.
	#[error("Request was cancelled before it was sent.")]
	Cancelled,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { source: Box::new(e) } } else { Self::network(e) }
	}
}

/// Failures to encode a request or interpret a response.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// Error response did not declare a JSON content type.
	#[error("non-json error response ({status}): {body}")]
	NonJsonErrorResponse {
		/// HTTP status code.
		status: u16,
		/// Raw response body.
		body: String,
	},
	/// Successful response did not declare a JSON content type.
	#[error("unexpected content type: {content_type}, body: {body}")]
	UnexpectedContentType {
		/// Content type as sent by the server (empty when absent).
		content_type: String,
		/// Raw response body.
		body: String,
	},
	/// Response declared JSON but did not match the expected shape.
	#[error("API returned malformed JSON (status {status}) at `{}`: {body}", .source.path())]
	MalformedJson {
		/// HTTP status code.
		status: u16,
		/// Leading part of the raw response body.
		body: String,
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be encoded as JSON.")]
	EncodeBody {
		/// Serialization failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Structured error body returned by the API for 4xx/5xx responses.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("API error: {status} {message} (Code: {code})")]
#[serde(default)]
pub struct ApiError {
	/// HTTP status reported in the body.
	#[serde(deserialize_with = "null_as_default")]
	pub status: u16,
	/// Human-readable message.
	#[serde(deserialize_with = "null_as_default")]
	pub message: String,
	/// Numeric application error code.
	#[serde(deserialize_with = "null_as_default")]
	pub code: i64,
	/// Raw reason string used for fine-grained classification.
	#[serde(rename = "error", skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}
impl ApiError {
	/// Raw reason the server uses for rejected bearer tokens.
	pub const INVALID_ACCESS_TOKEN: &'static str = "invalid access token";

	/// Returns `true` when the raw reason marks an invalid or expired bearer token.
	pub fn is_invalid_access_token(&self) -> bool {
		self.reason.as_deref() == Some(Self::INVALID_ACCESS_TOKEN)
	}
}
