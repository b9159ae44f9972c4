//! Typed async client for the Contabo REST API: one cached OAuth2 token with single-flight
//! refresh, a shared request pipeline with verbatim API errors, and thin typed services for
//! compute, DNS, storage, networking, users, tags, and secrets.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod obs;
pub mod sdk;
pub mod services;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::{_prelude::*, auth::ManualClock};

	// self
	use crate::{
		auth::TokenStore,
		client::ReqwestApiClient,
		config::{Config, Credentials},
		http::ReqwestHttpClient,
		oauth::ReqwestTransportErrorMapper,
	};

	/// Token store type backed by the reqwest transport.
	pub type ReqwestTestTokenStore = TokenStore<ReqwestHttpClient, ReqwestTransportErrorMapper>;

	/// Credentials accepted by every mock token endpoint in the test suites.
	pub fn test_credentials() -> Credentials {
		Credentials::new("test-client", "test-secret", "api@example.com", "test-password")
			.expect("Test credentials should be valid.")
	}

	/// Configuration pointing both endpoints at a mock server; the token endpoint lives at
	/// `{base}/token`.
	pub fn test_config(base: &str) -> Config {
		Config::builder(test_credentials())
			.auth_url(format!("{base}/token"))
			.base_url(base)
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Builds a token store over the default reqwest transport.
	pub fn test_token_store(base: &str) -> ReqwestTestTokenStore {
		let config = test_config(base);

		TokenStore::new(&config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
			.expect("Test token store should build.")
	}

	/// Builds a request pipeline over the default reqwest transport.
	pub fn test_client(base: &str) -> ReqwestApiClient {
		ReqwestApiClient::new(&test_config(base)).expect("Test client should build.")
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(all(test, feature = "reqwest"))] use {color_eyre as _, httpmock as _};
