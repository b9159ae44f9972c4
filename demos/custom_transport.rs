//! Plugs a customized reqwest client and a logging transport error mapper into the request
//! pipeline, then shows how transport failures surface when the API host is unreachable.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use contabo_api::{
	client::{CallContext, Client},
	config::{Config, Credentials},
	error::{Error, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata},
	oauth::{ReqwestTransportErrorMapper, TransportErrorMapper, oauth2::HttpClientError},
	obs::OperationKind,
	reqwest,
	sdk::Sdk,
	services::tag::CreateTagRequest,
};

#[derive(Debug, Default)]
struct LoggingMapper {
	inner: ReqwestTransportErrorMapper,
}
impl TransportErrorMapper<reqwest::Error> for LoggingMapper {
	fn map_transport_error(
		&self,
		operation: OperationKind,
		metadata: Option<&ResponseMetadata>,
		error: HttpClientError<reqwest::Error>,
	) -> Error {
		eprintln!("{operation} transport failure (metadata: {metadata:?}): {error}");

		self.inner.map_transport_error(operation, metadata, error)
	}
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":900}",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/tags").header("user-agent", "contabo-demo/1.0");
			then.status(201)
				.header("content-type", "application/json")
				.body(r##"{"data":[{"tagId":42,"name":"demo","color":"#0a78c3"}]}"##);
		})
		.await;

	let http_client = ReqwestHttpClient::with_client(
		reqwest::Client::builder()
			.user_agent("contabo-demo/1.0")
			.connect_timeout(Duration::from_secs(2))
			.build()?,
	);
	let credentials = Credentials::new("demo-client", "demo-secret", "ops@example.com", "demo-pass")?;
	let config = Config::builder(credentials)
		.auth_url(server.url("/token"))
		.base_url(server.base_url())
		.build()?;
	let client: Client<ReqwestHttpClient, LoggingMapper> =
		Client::with_http_client(&config, http_client.clone(), LoggingMapper::default())?;
	let sdk = Sdk::from_requester(client);
	let request = CreateTagRequest { name: "demo".into(), color: Some("#0a78c3".into()) };
	let tag = sdk.tag.create_tag(&CallContext::new(), &request).await?;

	println!("Created tag {} ({}).", tag.tag_id, tag.name);

	// Port 9 (discard) is closed on typical hosts.
	let unreachable = Config::builder(config.credentials.clone())
		.auth_url("http://127.0.0.1:9/token")
		.base_url("http://127.0.0.1:9")
		.build()?;
	let client: Client<ReqwestHttpClient, LoggingMapper> =
		Client::with_http_client(&unreachable, http_client, LoggingMapper::default())?;

	match client.get::<serde_json::Value>(&CallContext::new(), "/v1/tags").await {
		Err(Error::Transport(TransportError::Network { target, .. })) =>
			println!("Network failure while calling {target}."),
		other => println!("Unexpected outcome: {other:?}."),
	}

	Ok(())
}
