//! Shared request pipeline used by every resource service.
//!
//! [`Client`] resolves paths against the base URL, serializes JSON bodies, attaches the bearer
//! token obtained from its [`TokenStore`], and dispatches the request once over the shared
//! transport. Responses with status >= 400 surface as [`ApiError`] carrying the body verbatim;
//! anything else is decoded when the body is non-empty.

pub mod request;

pub use request::*;

// std
use std::time::Duration as StdDuration;
// crates.io
use oauth2::{
	AsyncHttpClient,
	http::{
		HeaderMap, HeaderValue, Method,
		header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
	},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
// self
use crate::{
	_prelude::*,
	auth::TokenStore,
	config::Config,
	error::{ApiError, ConfigError},
	http::{ApiHttpClient, ResponseMetadataSlot},
	oauth::TransportErrorMapper,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
};
#[cfg(feature = "reqwest")]
use crate::{http::ReqwestHttpClient, oauth::ReqwestTransportErrorMapper};

const X_REQUEST_ID: &str = "x-request-id";
const X_TRACE_ID: &str = "x-trace-id";
const APPLICATION_JSON: &str = "application/json";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport stack.
pub type ReqwestApiClient = Client<ReqwestHttpClient, ReqwestTransportErrorMapper>;

/// Authenticated request pipeline over a pluggable transport.
///
/// Cloning is cheap; clones share the transport and the token store.
pub struct Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// HTTP client wrapper used for every outbound request.
	pub http_client: Arc<C>,
	/// Mapper applied to transport-layer errors before surfacing them to callers.
	pub transport_mapper: Arc<M>,
	/// Token store supplying the bearer token.
	pub tokens: Arc<TokenStore<C, M>>,
	base_url: Url,
	timeout: StdDuration,
}
impl<C, M> Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a client that reuses the caller-provided transport + mapper pair.
	pub fn with_http_client(
		config: &Config,
		http_client: impl Into<Arc<C>>,
		mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let tokens = TokenStore::new(config, http_client, mapper)?;

		Ok(Self::from_token_store(config, Arc::new(tokens)))
	}

	/// Creates a client around an existing store, sharing the store's transport.
	///
	/// Use this to install a custom [`Clock`](crate::auth::Clock) or safety buffer.
	pub fn from_token_store(config: &Config, tokens: Arc<TokenStore<C, M>>) -> Self {
		Self {
			http_client: tokens.http_client().clone(),
			transport_mapper: tokens.transport_mapper().clone(),
			tokens,
			base_url: config.base_url.clone(),
			timeout: config.timeout,
		}
	}

	/// API base URL that request paths resolve against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Default deadline applied when a [`CallContext`] carries none.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// Builds an authenticated request for `path` (resolved with RFC 3986 reference
	/// resolution against the base URL).
	///
	/// The body is serialized before a token is requested, so an unencodable body never
	/// triggers an exchange. Waiting for the token is bounded by the context timeout (or the
	/// configured default); other token failures propagate unchanged.
	pub async fn new_request<B>(
		&self,
		ctx: &CallContext,
		method: Method,
		path: &str,
		body: Option<&B>,
	) -> Result<OutboundRequest>
	where
		B: ?Sized + Serialize,
	{
		let url = self
			.base_url
			.join(path)
			.map_err(|source| ConfigError::InvalidPath { path: path.to_owned(), source })?;
		let body = body
			.map(serde_json::to_vec)
			.transpose()
			.map_err(|source| Error::Encoding { source })?;
		let token = self.within(ctx, self.tokens.access_token()).await?;
		let request_id = Uuid::new_v4().to_string();
		let trace_id = ctx.trace_id().map(str::to_owned);
		let mut headers = HeaderMap::new();
		let mut authorization =
			HeaderValue::from_str(&token.bearer()).map_err(invalid_header)?;

		authorization.set_sensitive(true);
		headers.insert(AUTHORIZATION, authorization);
		headers.insert(X_REQUEST_ID, HeaderValue::from_str(&request_id).map_err(invalid_header)?);
		headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
		headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));

		if let Some(trace_id) = &trace_id {
			headers.insert(X_TRACE_ID, HeaderValue::from_str(trace_id).map_err(invalid_header)?);
		}

		Ok(OutboundRequest { method, url, headers, body, request_id, trace_id })
	}

	/// Sends `request` once and returns the raw response.
	///
	/// The transport call is bounded by the context timeout (or the configured default).
	/// Status >= 400 yields [`Error::Api`]; the body is always read in full.
	pub async fn dispatch(&self, ctx: &CallContext, request: OutboundRequest) -> Result<ApiResponse> {
		const KIND: OperationKind = OperationKind::ApiRequest;

		let span = OperationSpan::new(KIND, "dispatch");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span
			.instrument(async move {
				let request_id = request.request_id.clone();
				let trace_id = request.trace_id.clone();
				#[cfg(feature = "tracing")]
				let (method, url) = (request.method.clone(), request.url.clone());
				let http_request = request.into_http()?;
				let meta = ResponseMetadataSlot::default();
				let instrumented = self.http_client.with_metadata(meta.clone());
				let response = self
					.within(ctx, async {
						instrumented.call(http_request).await.map_err(|err| {
							self.transport_mapper.map_transport_error(KIND, meta.take().as_ref(), err)
						})
					})
					.await?;
				let status = response.status().as_u16();

				#[cfg(feature = "tracing")]
				tracing::debug!(%method, %url, status, request_id = %request_id, "API request completed.");

				if status >= 400 {
					let body = String::from_utf8_lossy(response.body()).into_owned();

					return Err(ApiError { status, body, request_id, trace_id }.into());
				}

				Ok(ApiResponse { status, body: response.into_body(), request_id })
			})
			.await;

		match &result {
			Ok(_) => obs::record_operation_outcome(KIND, OperationOutcome::Success),
			Err(_) => obs::record_operation_outcome(KIND, OperationOutcome::Failure),
		}

		result
	}

	/// Dispatches `request` and decodes a non-empty body into `T`.
	pub async fn execute<T>(&self, ctx: &CallContext, request: OutboundRequest) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.dispatch(ctx, request).await?.json()
	}

	// One deadline covers token acquisition and the transport call; dropping `future` cancels it.
	async fn within<F, T>(&self, ctx: &CallContext, future: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		let deadline = ctx.timeout.unwrap_or(self.timeout);

		tokio::time::timeout(deadline, future).await.map_err(|_| Error::Timeout { after: deadline })?
	}

	/// `GET path`.
	pub async fn get<T>(&self, ctx: &CallContext, path: &str) -> Result<Option<T>>
	where
		T: DeserializeOwned,
	{
		self.within(ctx, async {
			let request = self.new_request(ctx, Method::GET, path, None::<&()>).await?;

			self.execute(ctx, request).await
		})
		.await
	}

	/// `POST path` with an optional JSON body.
	pub async fn post<B, T>(
		&self,
		ctx: &CallContext,
		path: &str,
		body: Option<&B>,
	) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.within(ctx, async {
			let request = self.new_request(ctx, Method::POST, path, body).await?;

			self.execute(ctx, request).await
		})
		.await
	}

	/// `PUT path` with an optional JSON body.
	pub async fn put<B, T>(
		&self,
		ctx: &CallContext,
		path: &str,
		body: Option<&B>,
	) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.within(ctx, async {
			let request = self.new_request(ctx, Method::PUT, path, body).await?;

			self.execute(ctx, request).await
		})
		.await
	}

	/// `PATCH path` with an optional JSON body.
	pub async fn patch<B, T>(
		&self,
		ctx: &CallContext,
		path: &str,
		body: Option<&B>,
	) -> Result<Option<T>>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		self.within(ctx, async {
			let request = self.new_request(ctx, Method::PATCH, path, body).await?;

			self.execute(ctx, request).await
		})
		.await
	}

	/// `DELETE path`. No body is sent and the response body is discarded.
	pub async fn delete(&self, ctx: &CallContext, path: &str) -> Result<()> {
		self.within(ctx, async {
			let request = self.new_request(ctx, Method::DELETE, path, None::<&()>).await?;

			self.dispatch(ctx, request).await.map(|_| ())
		})
		.await
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestHttpClient, ReqwestTransportErrorMapper> {
	/// Creates a client that provisions its own reqwest-backed transport.
	pub fn new(config: &Config) -> Result<Self> {
		Self::with_http_client(config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
	}
}
impl<C, M> Clone for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn clone(&self) -> Self {
		Self {
			http_client: self.http_client.clone(),
			transport_mapper: self.transport_mapper.clone(),
			tokens: self.tokens.clone(),
			base_url: self.base_url.clone(),
			timeout: self.timeout,
		}
	}
}
impl<C, M> Debug for Client<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("base_url", &self.base_url.as_str())
			.field("timeout", &self.timeout)
			.field("tokens", &self.tokens)
			.finish()
	}
}

fn invalid_header(err: impl Into<oauth2::http::Error>) -> ConfigError {
	ConfigError::HttpRequest(err.into())
}
