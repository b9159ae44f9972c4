//! Token store with double-checked, single-flight password-grant exchanges.
//!
//! Readers take the shared lock and return the cached bearer token while it sits inside its
//! buffered lifetime. When the token is absent or stale, callers queue on one async mutex; the
//! first one performs the exchange and everyone behind it re-checks the cache before deciding to
//! call the token endpoint again. N concurrent callers on a stale cache therefore produce exactly
//! one exchange.

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{
		clock::{Clock, SystemClock},
		metrics::ExchangeMetrics,
		token::{DEFAULT_SAFETY_BUFFER, TokenCache, TokenState, secret::TokenSecret},
	},
	config::Config,
	http::ApiHttpClient,
	oauth::{PasswordGrantFacade, TransportErrorMapper},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};

/// Owns the single current bearer token and replaces it on demand.
pub struct TokenStore<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	facade: PasswordGrantFacade<C, M>,
	clock: Arc<dyn Clock>,
	safety_buffer: Duration,
	timeout: StdDuration,
	cache: RwLock<Option<TokenCache>>,
	singleflight: AsyncMutex<()>,
	metrics: ExchangeMetrics,
}
impl<C, M> TokenStore<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates an empty store that exchanges `config.credentials` at `config.auth_url`.
	///
	/// Exchanges run over `http_client` and are bounded by `config.timeout`.
	pub fn new(
		config: &Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		Ok(Self {
			facade: PasswordGrantFacade::from_config(config, http_client, mapper)?,
			clock: Arc::new(SystemClock),
			safety_buffer: DEFAULT_SAFETY_BUFFER,
			timeout: config.timeout,
			cache: RwLock::new(None),
			singleflight: AsyncMutex::new(()),
			metrics: ExchangeMetrics::default(),
		})
	}

	/// Replaces the time source used for expiry checks.
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = clock;

		self
	}

	/// Overrides the margin subtracted from `expires_in` (defaults to 60 seconds).
	pub fn with_safety_buffer(mut self, buffer: Duration) -> Self {
		self.safety_buffer = if buffer.is_negative() { Duration::ZERO } else { buffer };

		self
	}

	/// Transport shared with the request pipeline.
	pub fn http_client(&self) -> &Arc<C> {
		self.facade.http_client()
	}

	/// Error mapper shared with the request pipeline.
	pub fn transport_mapper(&self) -> &Arc<M> {
		self.facade.error_mapper()
	}

	/// Exchange counters for diagnostics.
	pub fn metrics(&self) -> &ExchangeMetrics {
		&self.metrics
	}

	/// Returns a valid bearer token, exchanging credentials only when the cache is absent or
	/// stale.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		if let Some(token) = self.cached() {
			return Ok(token);
		}

		let _singleflight = self.singleflight.lock().await;

		// Another caller may have finished an exchange while this one waited.
		if let Some(token) = self.cached() {
			return Ok(token);
		}

		self.exchange_locked("access_token").await
	}

	/// Performs a new exchange regardless of the cached token's state.
	///
	/// On failure the previous cache entry is left untouched.
	pub async fn refresh(&self) -> Result<()> {
		let _singleflight = self.singleflight.lock().await;

		self.exchange_locked("refresh").await.map(|_| ())
	}

	/// Reports the cached token's lifecycle at the current instant.
	pub fn state(&self) -> TokenState {
		let now = self.clock.now();

		self.cache.read().as_ref().map_or(TokenState::NoToken, |cache| cache.state_at(now))
	}

	/// Instant at which the cached token stops being handed out, if one exists.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.cache.read().as_ref().map(|cache| cache.expires_at)
	}

	/// Drops the cached token so the next call exchanges again.
	pub fn invalidate(&self) {
		*self.cache.write() = None;
	}

	fn cached(&self) -> Option<TokenSecret> {
		let now = self.clock.now();

		self.cache
			.read()
			.as_ref()
			.filter(|cache| cache.is_valid_at(now))
			.map(|cache| cache.token.access_token.clone())
	}

	// Callers must hold `singleflight`.
	async fn exchange_locked(&self, stage: &'static str) -> Result<TokenSecret> {
		const KIND: OperationKind = OperationKind::TokenExchange;

		let span = OperationSpan::new(KIND, stage);

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async {
				let token = tokio::time::timeout(self.timeout, self.facade.exchange())
					.await
					.map_err(|_| Error::Timeout { after: self.timeout })??;
				let cache = TokenCache::new(token, self.clock.now(), self.safety_buffer);
				let access_token = cache.token.access_token.clone();

				#[cfg(feature = "tracing")]
				tracing::debug!(
					expires_at = %cache.expires_at,
					issued_at = %cache.issued_at,
					"Token exchange succeeded."
				);

				*self.cache.write() = Some(cache);

				Ok(access_token)
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Success);
				self.metrics.record_success();
			},
			Err(_) => {
				obs::record_operation_outcome(KIND, OperationOutcome::Failure);
				self.metrics.record_failure();
			},
		}

		result
	}
}
impl<C, M> Debug for TokenStore<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore")
			.field("facade", &self.facade)
			.field("safety_buffer", &self.safety_buffer)
			.field("timeout", &self.timeout)
			.field("state", &self.state())
			.finish_non_exhaustive()
	}
}
