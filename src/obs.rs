//! Optional observability helpers for token exchanges and API requests.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `contabo_api.operation` with the
//!   `operation` and `stage` (call site) fields.
//! - Enable `metrics` to increment the `contabo_api_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Network-bound operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Password grant against the token endpoint.
	TokenExchange,
	/// Authenticated call against the resource API.
	ApiRequest,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::TokenExchange => "token_exchange",
			OperationKind::ApiRequest => "api_request",
		}
	}

	/// Human-readable endpoint class used in transport error messages.
	pub const fn target(self) -> &'static str {
		match self {
			OperationKind::TokenExchange => "the token endpoint",
			OperationKind::ApiRequest => "the API",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
