//! Lists compute instances through the SDK against a local mock of the token endpoint and API,
//! then forces a token refresh the way a caller would after a `401`.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use contabo_api::{
	api::ListOptions,
	client::CallContext,
	config::{Config, Credentials},
	sdk::Sdk,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":300}",
			);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/compute/instances");
			then.status(200).header("content-type", "application/json").body(
				r#"{"_pagination":{"size":10,"totalElements":1,"totalPages":1,"number":1},"data":[{"instanceId":1001,"displayName":"web-1","status":"running","region":"EU"}]}"#,
			);
		})
		.await;

	let credentials = Credentials::new("demo-client", "demo-secret", "ops@example.com", "demo-pass")?;
	let config = Config::builder(credentials)
		.auth_url(server.url("/token"))
		.base_url(server.base_url())
		.build()?;
	let sdk = Sdk::new(&config)?;
	let ctx = CallContext::new().with_trace_id("demo-trace");
	let page = sdk.compute.list_instances(&ctx, &ListOptions::new().size(10)).await?;

	for instance in &page.data {
		println!("{} {} ({})", instance.instance_id, instance.display_name, instance.status);
	}

	println!("Page {} of {}.", page.pagination.number, page.pagination.total_pages);

	sdk.requester().tokens.refresh().await?;

	println!("Token state after refresh: {:?}.", sdk.requester().tokens.state());

	token_mock.assert_calls_async(2).await;

	Ok(())
}
