// std
use std::sync::Arc;
// crates.io
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
// self
use contabo_api::{
	client::{CallContext, ReqwestApiClient},
	config::{Config, Credentials},
	error::Error,
};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Label {
	name: String,
}

fn build_client(server: &MockServer) -> ReqwestApiClient {
	let credentials = Credentials::new("cli-id", "cli-secret", "api@example.com", "api-password")
		.expect("Credential fixture should be valid.");
	let config = Config::builder(credentials)
		.auth_url(server.url("/token"))
		.base_url(server.base_url())
		.build()
		.expect("Configuration fixture should be valid.");

	ReqwestApiClient::new(&config).expect("Client should build.")
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"pipeline\",\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await
}

#[tokio::test]
async fn every_request_carries_standard_headers() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/labels")
				.header("authorization", "Bearer pipeline")
				.header("content-type", "application/json")
				.header("accept", "application/json")
				.header("x-trace-id", "trace-42")
				.header_exists("x-request-id")
				.json_body(serde_json::json!({ "name": "web" }));
			then.status(201)
				.header("content-type", "application/json")
				.body("{\"name\":\"web\"}");
		})
		.await;
	let client = build_client(&server);
	let ctx = CallContext::new().with_trace_id("trace-42");
	let created: Option<Label> = client
		.post(&ctx, "/v1/labels", Some(&Label { name: "web".into() }))
		.await
		.expect("Create should succeed.");

	assert_eq!(created, Some(Label { name: "web".into() }));

	mock.assert_async().await;
	token.assert_async().await;
}

#[tokio::test]
async fn error_status_keeps_body_and_identifiers() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/labels/9");
			then.status(401).body("{\"statusCode\":401,\"message\":\"token expired\"}");
		})
		.await;

	let client = build_client(&server);
	let ctx = CallContext::new().with_trace_id("trace-401");
	let err = client
		.get::<Label>(&ctx, "/v1/labels/9")
		.await
		.expect_err("401 must surface as an API error.");

	assert!(err.is_unauthorized());
	assert_eq!(err.status(), Some(401));

	match err {
		Error::Api(api) => {
			assert_eq!(api.body, "{\"statusCode\":401,\"message\":\"token expired\"}");
			assert_eq!(api.trace_id.as_deref(), Some("trace-401"));
			assert_eq!(api.request_id.len(), 36);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn unauthorized_caller_can_force_a_refresh() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/labels");
			then.status(401).body("expired");
		})
		.await;

	let client = build_client(&server);
	let err = client
		.get::<Label>(&CallContext::new(), "/v1/labels")
		.await
		.expect_err("401 must surface as an API error.");

	assert!(err.is_unauthorized());

	client.tokens.refresh().await.expect("Forced refresh should succeed.");

	token.assert_calls_async(2).await;
}

#[tokio::test]
async fn undecodable_success_body_is_a_decoding_error() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/labels/1");
			then.status(200).body("{\"name\": 42}");
		})
		.await;

	let err = build_client(&server)
		.get::<Label>(&CallContext::new(), "/v1/labels/1")
		.await
		.expect_err("Mistyped body must fail to decode.");

	match err {
		Error::Decoding { status, source } => {
			assert_eq!(status, 200);
			assert_eq!(source.path().to_string(), "name");
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn non_json_success_body_is_a_decoding_error() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/labels/2");
			then.status(200).body("not json");
		})
		.await;

	let err = build_client(&server)
		.get::<Label>(&CallContext::new(), "/v1/labels/2")
		.await
		.expect_err("Non-JSON body must fail to decode.");

	assert!(matches!(err, Error::Decoding { status: 200, .. }), "{err:?}");
}

#[tokio::test]
async fn empty_body_decodes_to_none() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(PUT).path("/v1/labels/1");
			then.status(204);
		})
		.await;

	let updated: Option<Label> = build_client(&server)
		.put(&CallContext::new(), "/v1/labels/1", Some(&Label { name: "db".into() }))
		.await
		.expect("Empty response should succeed.");

	assert_eq!(updated, None);
}

#[tokio::test]
async fn delete_sends_no_body_and_discards_the_response() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/labels/3").body("");
			then.status(200).body("not json at all");
		})
		.await;

	build_client(&server)
		.delete(&CallContext::new(), "/v1/labels/3")
		.await
		.expect("Delete should ignore the response body.");

	mock.assert_async().await;
}

#[tokio::test]
async fn clones_share_the_token_store() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/labels/1");
			then.status(200).body("{\"name\":\"a\"}");
		})
		.await;

	let client = build_client(&server);
	let clone = client.clone();

	assert!(Arc::ptr_eq(&client.tokens, &clone.tokens));

	let ctx = CallContext::new();
	let (first, second) = tokio::join!(
		client.get::<Label>(&ctx, "/v1/labels/1"),
		clone.get::<Label>(&ctx, "/v1/labels/1"),
	);

	first.expect("First call should succeed.");
	second.expect("Second call should succeed.");

	token.assert_calls_async(1).await;
}
