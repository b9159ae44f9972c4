//! Client-level error types shared across the token store, request pipeline, and services.

// std
use std::time::Duration as StdDuration;
// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Token endpoint answered with something other than a usable token.
	#[error(transparent)]
	TokenResponse(#[from] TokenResponseError),
	/// Resource endpoint answered with status >= 400.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// Token endpoint rejected the password grant.
	#[error("Authentication failed with status {status}: {body}.")]
	AuthenticationFailed {
		/// HTTP status returned by the token endpoint.
		status: u16,
		/// Raw response body, attached verbatim.
		body: String,
	},
	/// The call did not complete before its deadline.
	#[error("Request timed out after {after:?}.")]
	Timeout {
		/// Deadline that elapsed.
		after: StdDuration,
	},
	/// Request body could not be serialized; nothing was sent.
	#[error("Failed to encode the request body.")]
	Encoding {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// Successful response body could not be decoded into the target type.
	#[error("Failed to decode the response body (status {status}).")]
	Decoding {
		/// HTTP status of the response being decoded.
		status: u16,
		/// Structured decoding failure, including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// A single-item response carried an empty `data` array.
	#[error("No {resource} returned by the API.")]
	NotFound {
		/// Resource label (instance, zone, record, ...).
		resource: &'static str,
	},
}
impl Error {
	/// Returns the HTTP status attached to the error, when one is known.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Api(err) => Some(err.status),
			Self::AuthenticationFailed { status, .. } | Self::Decoding { status, .. } =>
				Some(*status),
			_ => None,
		}
	}

	/// Returns `true` when the API rejected the bearer token.
	///
	/// Callers typically react by calling [`TokenStore::refresh`](crate::auth::TokenStore::refresh)
	/// before retrying the operation themselves.
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Api(err) if err.is_unauthorized())
	}
}

/// Configuration and validation failures, detected before any network call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// OAuth client identifier is empty.
	#[error("Client ID is required.")]
	MissingClientId,
	/// OAuth client secret is empty.
	#[error("Client secret is required.")]
	MissingClientSecret,
	/// API user (email) is empty.
	#[error("Username (API user email) is required.")]
	MissingUsername,
	/// API password is empty.
	#[error("Password (API password) is required.")]
	MissingPassword,
	/// Required environment variable is absent or not unicode.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// One of the configured URLs cannot be parsed.
	#[error("The {which} URL is invalid.")]
	InvalidUrl {
		/// Which URL failed (`auth` or `base`).
		which: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Request path cannot be resolved against the base URL.
	#[error("Request path `{path}` cannot be resolved against the base URL.")]
	InvalidPath {
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Token endpoint URL was rejected by the OAuth facade.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// The token endpoint answered 200 but the payload is unusable.
#[derive(Debug, ThisError)]
pub enum TokenResponseError {
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	Parse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token endpoint response omitted `expires_in`.
	#[error("Token endpoint response is missing expires_in.")]
	MissingExpiresIn,
	/// Token endpoint returned an excessively large `expires_in`.
	#[error("The expires_in value exceeds the supported range.")]
	ExpiresInOutOfRange,
	/// Token endpoint returned a response the OAuth facade could not classify.
	#[error("Token endpoint returned an unexpected response: {message}.")]
	Unexpected {
		/// Facade-supplied message summarizing the failure.
		message: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {target}.")]
	Network {
		/// Endpoint class being called (`the token endpoint` or `the API`).
		target: &'static str,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred during transport.")]
	Io(#[from] std::io::Error),
	/// HTTP client reported a failure it could not classify further.
	#[error("HTTP client error occurred while calling {target}: {message}.")]
	Other {
		/// Endpoint class being called.
		target: &'static str,
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(
		target: &'static str,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Network { target, source: Box::new(src) }
	}
}

/// Error returned by a resource endpoint (HTTP status >= 400).
///
/// The body is attached verbatim. The request and trace identifiers match the headers that were
/// sent, so the failure can be located in server-side logs.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API error (status {status}): {body}")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: String,
	/// `x-request-id` sent with the failing request.
	pub request_id: String,
	/// `x-trace-id` sent with the failing request, if any.
	pub trace_id: Option<String>,
}
impl ApiError {
	/// Returns `true` for `401 Unauthorized`.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn api_error_display_keeps_body_verbatim() {
		let err = ApiError {
			status: 401,
			body: "{\"message\":\"expired\"}".into(),
			request_id: "req-1".into(),
			trace_id: None,
		};

		assert_eq!(err.to_string(), "API error (status 401): {\"message\":\"expired\"}");
		assert!(Error::from(err).is_unauthorized());
	}

	#[test]
	fn status_is_exposed_for_http_backed_variants() {
		let err = Error::AuthenticationFailed { status: 403, body: "denied".into() };

		assert_eq!(err.status(), Some(403));
		assert_eq!(Error::NotFound { resource: "zone" }.status(), None);
		assert_eq!(Error::NotFound { resource: "zone" }.to_string(), "No zone returned by the API.");
	}
}
