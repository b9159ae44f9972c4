//! Token issued by the password grant and the cache entry derived from it.

pub mod secret;

// self
use crate::{_prelude::*, auth::token::secret::TokenSecret};

/// Default margin subtracted from `expires_in` so tokens are replaced before the server
/// rejects them.
pub const DEFAULT_SAFETY_BUFFER: Duration = Duration::seconds(60);

/// Token payload returned by a successful password grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
	/// Bearer token attached to every API request.
	pub access_token: TokenSecret,
	/// Token type reported by the server, normally `bearer`.
	pub token_type: String,
	/// Lifetime reported by the server.
	pub expires_in: Duration,
	/// Refresh token, if issued. The store re-runs the password grant instead of using it.
	pub refresh_token: Option<TokenSecret>,
	/// Lifetime of the refresh token, if reported.
	pub refresh_expires_in: Option<Duration>,
	/// Space-delimited scopes granted to the token.
	pub scope: Option<String>,
}

/// Lazily evaluated lifecycle of the cached token.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenState {
	/// No exchange has succeeded yet, or the token was invalidated.
	NoToken,
	/// Cached token is usable at the current instant.
	Valid,
	/// Cached token reached its buffered expiry.
	Expired,
}

/// The single current token together with its absolute expiry.
#[derive(Clone, Debug)]
pub(crate) struct TokenCache {
	pub(crate) token: Token,
	pub(crate) issued_at: OffsetDateTime,
	pub(crate) expires_at: OffsetDateTime,
}
impl TokenCache {
	pub(crate) fn new(token: Token, issued_at: OffsetDateTime, safety_buffer: Duration) -> Self {
		let expires_at = issued_at + token.expires_in - safety_buffer;

		Self { token, issued_at, expires_at }
	}

	pub(crate) fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}

	pub(crate) fn state_at(&self, now: OffsetDateTime) -> TokenState {
		if self.is_valid_at(now) { TokenState::Valid } else { TokenState::Expired }
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	fn token(expires_in: Duration) -> Token {
		Token {
			access_token: TokenSecret::new("access"),
			token_type: "bearer".into(),
			expires_in,
			refresh_token: None,
			refresh_expires_in: None,
			scope: None,
		}
	}

	#[test]
	fn expiry_subtracts_safety_buffer() {
		let issued_at = datetime!(2025-01-01 00:00 UTC);
		let cache = TokenCache::new(token(Duration::seconds(300)), issued_at, DEFAULT_SAFETY_BUFFER);

		assert_eq!(cache.expires_at, datetime!(2025-01-01 00:04 UTC));
		assert!(cache.is_valid_at(issued_at + Duration::seconds(239)));
		assert_eq!(cache.state_at(issued_at + Duration::seconds(240)), TokenState::Expired);
	}

	#[test]
	fn short_lived_token_is_stale_immediately() {
		let issued_at = datetime!(2025-01-01 00:00 UTC);
		let cache = TokenCache::new(token(Duration::seconds(30)), issued_at, DEFAULT_SAFETY_BUFFER);

		assert_eq!(cache.state_at(issued_at), TokenState::Expired);
		assert_eq!(cache.issued_at, issued_at);
	}
}
