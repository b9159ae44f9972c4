//! OAuth2 password-grant facade and transport error mapping.

pub use oauth2;

// crates.io
use oauth2::{
	AuthType, ClientId, ClientSecret, EndpointNotSet, EndpointSet, ExtraTokenFields,
	HttpClientError, RequestTokenError, ResourceOwnerPassword, ResourceOwnerUsername,
	StandardRevocableToken, StandardTokenResponse, TokenResponse, TokenUrl,
	basic::{
		BasicErrorResponse, BasicRequestTokenError, BasicRevocationErrorResponse,
		BasicTokenIntrospectionResponse, BasicTokenType,
	},
};
// self
use crate::{
	_prelude::*,
	auth::{Token, TokenSecret},
	config::Config,
	error::{ConfigError, TokenResponseError, TransportError},
	http::{ApiHttpClient, ResponseMetadata, ResponseMetadataSlot},
	obs::OperationKind,
};

type PasswordGrantTokenResponse = StandardTokenResponse<PasswordGrantFields, BasicTokenType>;
type PasswordGrantClient = oauth2::Client<
	BasicErrorResponse,
	PasswordGrantTokenResponse,
	BasicTokenIntrospectionResponse,
	StandardRevocableToken,
	BasicRevocationErrorResponse,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointNotSet,
	EndpointSet,
>;
type FacadeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + 'a + Send>>;

/// Maps HTTP transport failures into client [`Error`] values.
pub trait TransportErrorMapper<E>
where
	Self: 'static + Send + Sync,
	E: 'static + Send + Sync + StdError,
{
	/// Converts an [`HttpClientError`] emitted by the transport into a client error.
	fn map_transport_error(
		&self,
		operation: OperationKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<E>,
	) -> Error;
}

/// Default mapper for reqwest-backed transports.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug, Default)]
pub struct ReqwestTransportErrorMapper;
#[cfg(feature = "reqwest")]
impl TransportErrorMapper<ReqwestError> for ReqwestTransportErrorMapper {
	fn map_transport_error(
		&self,
		operation: OperationKind,
		_meta: Option<&ResponseMetadata>,
		err: HttpClientError<ReqwestError>,
	) -> Error {
		match err {
			HttpClientError::Reqwest(inner) => map_reqwest_error(operation, *inner),
			HttpClientError::Http(inner) => ConfigError::from(inner).into(),
			HttpClientError::Io(inner) => TransportError::Io(inner).into(),
			HttpClientError::Other(message) =>
				TransportError::Other { target: operation.target(), message }.into(),
			_ => TransportError::Other {
				target: operation.target(),
				message: "unclassified HTTP client failure".into(),
			}
			.into(),
		}
	}
}

/// Extra fields the token endpoint returns next to the standard OAuth2 response.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordGrantFields {
	/// Lifetime of the refresh token in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub refresh_expires_in: Option<u64>,
	/// Identity-provider session identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_state: Option<String>,
	/// Identity-provider `not-before-policy` marker.
	#[serde(default, rename = "not-before-policy", skip_serializing_if = "Option::is_none")]
	pub not_before_policy: Option<i64>,
}
impl ExtraTokenFields for PasswordGrantFields {}

/// Performs the password grant over an [`ApiHttpClient`].
pub(crate) struct PasswordGrantFacade<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	oauth_client: PasswordGrantClient,
	username: ResourceOwnerUsername,
	password: ResourceOwnerPassword,
	http_client: Arc<C>,
	error_mapper: Arc<M>,
}
impl<C, M> PasswordGrantFacade<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	pub(crate) fn from_config(
		config: &Config,
		http_client: impl Into<Arc<C>>,
		error_mapper: impl Into<Arc<M>>,
	) -> Result<Self> {
		let credentials = &config.credentials;
		let token_url = TokenUrl::new(config.auth_url.to_string())
			.map_err(|source| ConfigError::InvalidTokenUrl { source })?;
		// Credentials travel in the form body next to the grant parameters.
		let oauth_client = oauth2::Client::new(ClientId::new(credentials.client_id().to_owned()))
			.set_client_secret(ClientSecret::new(credentials.client_secret().to_owned()))
			.set_auth_type(AuthType::RequestBody)
			.set_token_uri(token_url);

		Ok(Self {
			oauth_client,
			username: ResourceOwnerUsername::new(credentials.username().to_owned()),
			password: ResourceOwnerPassword::new(credentials.password().to_owned()),
			http_client: http_client.into(),
			error_mapper: error_mapper.into(),
		})
	}

	pub(crate) fn http_client(&self) -> &Arc<C> {
		&self.http_client
	}

	pub(crate) fn error_mapper(&self) -> &Arc<M> {
		&self.error_mapper
	}

	pub(crate) fn exchange(&self) -> FacadeFuture<'_, Token> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.with_metadata(meta.clone());
			let response = self
				.oauth_client
				.exchange_password(&self.username, &self.password)
				.request_async(&instrumented)
				.await
				.map_err(|err| map_request_error(meta.take(), err, self.error_mapper.as_ref()))?;

			map_token_response(response)
		})
	}
}
impl<C, M> Debug for PasswordGrantFacade<C, M>
where
	C: ?Sized + ApiHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PasswordGrantFacade")
			.field("username", &self.username.as_str())
			.finish_non_exhaustive()
	}
}

fn map_token_response(response: PasswordGrantTokenResponse) -> Result<Token> {
	let expires_in = response.expires_in().ok_or(TokenResponseError::MissingExpiresIn)?;
	let expires_in = seconds(expires_in.as_secs())?;
	let extra = response.extra_fields();
	let refresh_expires_in = extra.refresh_expires_in.map(seconds).transpose()?;
	let scope = response.scopes().map(|scopes| {
		scopes.iter().map(|scope| scope.as_str()).collect::<Vec<_>>().join(" ")
	});

	Ok(Token {
		access_token: TokenSecret::new(response.access_token().secret().to_owned()),
		token_type: response.token_type().as_ref().to_owned(),
		expires_in,
		refresh_token: response.refresh_token().map(|token| TokenSecret::new(token.secret())),
		refresh_expires_in,
		scope,
	})
}

fn seconds(value: u64) -> Result<Duration> {
	let value = i64::try_from(value).map_err(|_| TokenResponseError::ExpiresInOutOfRange)?;

	Ok(Duration::seconds(value))
}

fn map_request_error<E, M>(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<E>>,
	mapper: &M,
) -> Error
where
	E: 'static + Send + Sync + StdError,
	M: ?Sized + TransportErrorMapper<E>,
{
	let meta_ref = meta.as_ref();

	if let RequestTokenError::Request(error) = err {
		return mapper.map_transport_error(OperationKind::TokenExchange, meta_ref, error);
	}
	// Any answer other than 200 is a rejected grant, whatever shape its body has.
	if let Some((status, body)) = meta_ref.and_then(ResponseMetadata::rejection) {
		return Error::AuthenticationFailed { status, body };
	}

	match err {
		RequestTokenError::Parse(source, _body) => TokenResponseError::Parse { source }.into(),
		RequestTokenError::ServerResponse(response) => TokenResponseError::Unexpected {
			message: format!("OAuth error `{}`", response.error().as_ref()),
		}
		.into(),
		// The oauth2 crate rejects empty bodies and non-JSON content types before parsing.
		RequestTokenError::Other(message) => match meta_ref {
			Some(ResponseMetadata { status: Some(200), body }) =>
				match reparse(body.as_deref().unwrap_or_default()) {
					Some(source) => TokenResponseError::Parse { source }.into(),
					None => TokenResponseError::Unexpected { message }.into(),
				},
			_ => TokenResponseError::Unexpected { message }.into(),
		},
		RequestTokenError::Request(error) =>
			mapper.map_transport_error(OperationKind::TokenExchange, meta_ref, error),
	}
}

fn reparse(body: &str) -> Option<serde_path_to_error::Error<serde_json::Error>> {
	let mut deserializer = serde_json::Deserializer::from_str(body);

	serde_path_to_error::deserialize::<_, PasswordGrantTokenResponse>(&mut deserializer).err()
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(operation: OperationKind, err: ReqwestError) -> Error {
	if err.is_builder() {
		return ConfigError::from(err).into();
	}

	TransportError::network(operation.target(), err).into()
}
