//! Static credentials and endpoint configuration, validated once at construction.

// std
use std::{env, time::Duration as StdDuration};
// self
use crate::{_prelude::*, error::ConfigError};

/// Default OAuth2 token endpoint.
pub const DEFAULT_AUTH_URL: &str =
	"https://auth.contabo.com/auth/realms/contabo/protocol/openid-connect/token";
/// Default API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.contabo.com";
/// Request timeout applied when a call does not supply its own.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

const ENV_CLIENT_ID: &str = "CONTABO_CLIENT_ID";
const ENV_CLIENT_SECRET: &str = "CONTABO_CLIENT_SECRET";
const ENV_API_USER: &str = "CONTABO_API_USER";
const ENV_API_PASSWORD: &str = "CONTABO_API_PASSWORD";
const ENV_AUTH_URL: &str = "CONTABO_AUTH_URL";
const ENV_BASE_URL: &str = "CONTABO_BASE_URL";

/// OAuth2 client credentials plus the API user used for the password grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	client_id: String,
	client_secret: String,
	username: String,
	password: String,
}
impl Credentials {
	/// Validates and wraps the four credential fields.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Result<Self, ConfigError> {
		let credentials = Self {
			client_id: client_id.into(),
			client_secret: client_secret.into(),
			username: username.into(),
			password: password.into(),
		};

		credentials.validate()?;

		Ok(credentials)
	}

	/// Loads credentials from `CONTABO_CLIENT_ID`, `CONTABO_CLIENT_SECRET`, `CONTABO_API_USER`,
	/// and `CONTABO_API_PASSWORD`.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::new(
			required_env(ENV_CLIENT_ID)?,
			required_env(ENV_CLIENT_SECRET)?,
			required_env(ENV_API_USER)?,
			required_env(ENV_API_PASSWORD)?,
		)
	}

	/// OAuth client identifier.
	pub fn client_id(&self) -> &str {
		&self.client_id
	}

	/// OAuth client secret. Callers must avoid logging this string.
	pub fn client_secret(&self) -> &str {
		&self.client_secret
	}

	/// API user email.
	pub fn username(&self) -> &str {
		&self.username
	}

	/// API password. Callers must avoid logging this string.
	pub fn password(&self) -> &str {
		&self.password
	}

	fn validate(&self) -> Result<(), ConfigError> {
		if is_blank(&self.client_id) {
			return Err(ConfigError::MissingClientId);
		}
		if is_blank(&self.client_secret) {
			return Err(ConfigError::MissingClientSecret);
		}
		if is_blank(&self.username) {
			return Err(ConfigError::MissingUsername);
		}
		if is_blank(&self.password) {
			return Err(ConfigError::MissingPassword);
		}

		Ok(())
	}
}
impl Debug for Credentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Credentials")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
	/// Password-grant credentials.
	pub credentials: Credentials,
	/// OAuth2 token endpoint.
	pub auth_url: Url,
	/// API base URL that request paths resolve against.
	pub base_url: Url,
	/// Timeout applied to calls that do not set their own.
	pub timeout: StdDuration,
}
impl Config {
	/// Creates a configuration that targets the public endpoints.
	pub fn new(credentials: Credentials) -> Result<Self, ConfigError> {
		Self::builder(credentials).build()
	}

	/// Creates a new builder seeded with the provided credentials.
	pub fn builder(credentials: Credentials) -> ConfigBuilder {
		ConfigBuilder::new(credentials)
	}

	/// Loads credentials from the environment; `CONTABO_AUTH_URL` and `CONTABO_BASE_URL`
	/// override the default endpoints when set.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut builder = Self::builder(Credentials::from_env()?);

		if let Some(auth_url) = optional_env(ENV_AUTH_URL) {
			builder = builder.auth_url(auth_url);
		}
		if let Some(base_url) = optional_env(ENV_BASE_URL) {
			builder = builder.base_url(base_url);
		}

		builder.build()
	}
}

/// Builder for [`Config`] values.
#[derive(Debug)]
pub struct ConfigBuilder {
	/// Credentials for the password grant.
	pub credentials: Credentials,
	/// Raw token endpoint URL.
	pub auth_url: String,
	/// Raw API base URL.
	pub base_url: String,
	/// Default per-call timeout.
	pub timeout: StdDuration,
}
impl ConfigBuilder {
	/// Creates a new builder that targets the default endpoints.
	pub fn new(credentials: Credentials) -> Self {
		Self {
			credentials,
			auth_url: DEFAULT_AUTH_URL.into(),
			base_url: DEFAULT_BASE_URL.into(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Overrides the token endpoint.
	pub fn auth_url(mut self, url: impl Into<String>) -> Self {
		self.auth_url = url.into();

		self
	}

	/// Overrides the API base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Overrides the default per-call timeout.
	pub fn timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<Config, ConfigError> {
		self.credentials.validate()?;

		let auth_url = Url::parse(&self.auth_url)
			.map_err(|source| ConfigError::InvalidUrl { which: "auth", source })?;
		let base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidUrl { which: "base", source })?;

		Ok(Config { credentials: self.credentials, auth_url, base_url, timeout: self.timeout })
	}
}

fn is_blank(value: &str) -> bool {
	value.trim().is_empty()
}

fn required_env(name: &'static str) -> Result<String, ConfigError> {
	env::var(name).map_err(|_| ConfigError::MissingEnv { name })
}

fn optional_env(name: &'static str) -> Option<String> {
	env::var(name).ok().filter(|value| !is_blank(value))
}
