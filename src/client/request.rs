//! Per-call context, outbound requests, and raw responses.

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{
	HttpRequest,
	http::{HeaderMap, Method, Request},
};
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::ConfigError};

/// Explicit per-call context carried into every request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallContext {
	/// Trace identifier forwarded as `x-trace-id`.
	pub trace_id: Option<String>,
	/// Deadline for the HTTP exchange; falls back to the configured default.
	pub timeout: Option<StdDuration>,
}
impl CallContext {
	/// Creates an empty context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches a trace identifier.
	pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
		self.trace_id = Some(trace_id.into());

		self
	}

	/// Overrides the request deadline.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = Some(timeout);

		self
	}

	/// Returns the trace identifier when it is present and non-empty.
	pub fn trace_id(&self) -> Option<&str> {
		self.trace_id.as_deref().filter(|value| !value.is_empty())
	}
}

/// Fully prepared request, built fresh per call and consumed by dispatch.
#[derive(Clone, Debug)]
pub struct OutboundRequest {
	/// HTTP verb.
	pub method: Method,
	/// Absolute URL resolved against the base URL.
	pub url: Url,
	/// Headers, including the sensitive `Authorization` value.
	pub headers: HeaderMap,
	/// Serialized JSON body.
	pub body: Option<Vec<u8>>,
	/// Value of the `x-request-id` header.
	pub request_id: String,
	/// Value of the `x-trace-id` header, if one was sent.
	pub trace_id: Option<String>,
}
impl OutboundRequest {
	pub(crate) fn into_http(self) -> Result<HttpRequest> {
		let mut request = Request::builder()
			.method(self.method)
			.uri(self.url.as_str())
			.body(self.body.unwrap_or_default())
			.map_err(ConfigError::from)?;

		*request.headers_mut() = self.headers;

		Ok(request)
	}
}

/// Successful (status < 400) response with its body fully read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body bytes.
	pub body: Vec<u8>,
	/// `x-request-id` sent with the request that produced this response.
	pub request_id: String,
}
impl ApiResponse {
	/// Decodes the body as JSON; an empty body yields `None`.
	pub fn json<T>(&self) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		if self.body.is_empty() {
			return Ok(None);
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut deserializer)
			.map(Some)
			.map_err(|source| Error::Decoding { status: self.status, source })
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug, Deserialize)]
	struct Probe {
		name: String,
	}

	fn response(body: &str) -> ApiResponse {
		ApiResponse { status: 200, body: body.as_bytes().to_vec(), request_id: "req".into() }
	}

	#[test]
	fn empty_body_decodes_to_none() {
		let probe = response("").json::<Probe>().expect("Empty body should not fail.");

		assert!(probe.is_none());
	}

	#[test]
	fn decoding_failure_reports_status_and_path() {
		let err = response("{\"name\":7}")
			.json::<Probe>()
			.expect_err("Numeric name must fail to decode.");

		match err {
			Error::Decoding { status, source } => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "name");
			},
			other => panic!("Unexpected error: {other:?}."),
		}
	}

	#[test]
	fn decodes_json_body() {
		let probe = response("{\"name\":\"vps\"}")
			.json::<Probe>()
			.expect("Valid JSON should decode.")
			.expect("Non-empty body should yield a value.");

		assert_eq!(probe.name, "vps");
	}

	#[test]
	fn blank_trace_id_is_ignored() {
		assert_eq!(CallContext::new().with_trace_id("").trace_id(), None);
		assert_eq!(CallContext::new().with_trace_id("t-1").trace_id(), Some("t-1"));
	}
}
