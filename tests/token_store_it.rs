// std
use std::{sync::Arc, time::Duration as StdDuration};
// crates.io
use httpmock::prelude::*;
use time::{Duration, macros::datetime};
// self
use contabo_api::{
	auth::{ManualClock, TokenState, TokenStore},
	config::{Config, Credentials},
	error::{Error, TokenResponseError},
	http::ReqwestHttpClient,
	oauth::ReqwestTransportErrorMapper,
};

type Store = TokenStore<ReqwestHttpClient, ReqwestTransportErrorMapper>;

fn build_store(server: &MockServer) -> Store {
	let credentials = Credentials::new("cli-id", "cli-secret", "api@example.com", "api-password")
		.expect("Credential fixture should be valid.");
	let config = Config::builder(credentials)
		.auth_url(server.url("/token"))
		.base_url(server.base_url())
		.build()
		.expect("Configuration fixture should be valid.");

	TokenStore::new(&config, ReqwestHttpClient::default(), ReqwestTransportErrorMapper)
		.expect("Token store should build.")
}

fn token_body(access_token: &str, expires_in: u64) -> String {
	format!(
		"{{\"access_token\":\"{access_token}\",\"token_type\":\"Bearer\",\"expires_in\":{expires_in},\"refresh_expires_in\":1800,\"not-before-policy\":0,\"session_state\":\"s-1\"}}"
	)
}

#[tokio::test]
async fn password_grant_posts_credentials_in_form_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded")
				.form_urlencoded_tuple("grant_type", "password")
				.form_urlencoded_tuple("username", "api@example.com")
				.form_urlencoded_tuple("password", "api-password")
				.form_urlencoded_tuple("client_id", "cli-id")
				.form_urlencoded_tuple("client_secret", "cli-secret");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("granted", 300));
		})
		.await;
	let store = build_store(&server);
	let token = store.access_token().await.expect("Password grant should succeed.");

	assert_eq!(token.expose(), "granted");

	mock.assert_async().await;
}

#[tokio::test]
async fn cached_token_is_reused_until_the_buffered_expiry() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("cached", 300));
		})
		.await;
	let clock = Arc::new(ManualClock::new(datetime!(2025-03-01 12:00 UTC)));
	let store = build_store(&server).with_clock(clock.clone());

	store.access_token().await.expect("First exchange should succeed.");
	clock.advance(Duration::seconds(239));
	store.access_token().await.expect("Cached token should be returned.");

	mock.assert_calls_async(1).await;
	assert_eq!(store.state(), TokenState::Valid);

	clock.advance(Duration::seconds(1));

	assert_eq!(store.state(), TokenState::Expired);

	store.access_token().await.expect("Expired token should be replaced.");

	mock.assert_calls_async(2).await;
	assert_eq!(store.metrics().successes(), 2);
}

#[tokio::test]
async fn concurrent_callers_share_one_exchange() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.delay(StdDuration::from_millis(150))
				.body(token_body("shared", 3600));
		})
		.await;
	let store = Arc::new(build_store(&server));
	let handles = (0..16)
		.map(|_| {
			let store = store.clone();

			tokio::spawn(async move { store.access_token().await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		let token = handle
			.await
			.expect("Token task should not panic.")
			.expect("Concurrent access should succeed.");

		assert_eq!(token.expose(), "shared");
	}

	mock.assert_calls_async(1).await;
	assert_eq!(store.metrics().attempts(), 1);
}

#[tokio::test]
async fn concurrent_callers_on_an_expired_token_share_one_exchange() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.delay(StdDuration::from_millis(150))
				.body(token_body("rotated", 300));
		})
		.await;
	let clock = Arc::new(ManualClock::new(datetime!(2025-03-01 12:00 UTC)));
	let store = Arc::new(build_store(&server).with_clock(clock.clone()));

	store.access_token().await.expect("Initial exchange should succeed.");
	clock.advance(Duration::seconds(240));

	assert_eq!(store.state(), TokenState::Expired);

	let handles = (0..16)
		.map(|_| {
			let store = store.clone();

			tokio::spawn(async move { store.access_token().await })
		})
		.collect::<Vec<_>>();

	for handle in handles {
		handle
			.await
			.expect("Token task should not panic.")
			.expect("Concurrent access should succeed.");
	}

	mock.assert_calls_async(2).await;
	assert_eq!(store.metrics().attempts(), 2);
	assert_eq!(store.state(), TokenState::Valid);
}

#[tokio::test]
async fn refresh_always_exchanges() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body(token_body("fresh", 3600));
		})
		.await;
	let store = build_store(&server);

	store.access_token().await.expect("Initial exchange should succeed.");
	store.refresh().await.expect("First forced refresh should succeed.");
	store.refresh().await.expect("Second forced refresh should succeed.");
	store.access_token().await.expect("Refreshed token should be cached.");

	mock.assert_calls_async(3).await;
}

#[tokio::test]
async fn rejected_grant_reports_status_and_body_verbatim() {
	let server = MockServer::start_async().await;
	let body = "{\"error\":\"invalid_grant\",\"error_description\":\"Invalid user credentials\"}";

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(401).header("content-type", "application/json").body(body);
		})
		.await;

	let store = build_store(&server);
	let err = store.access_token().await.expect_err("Rejected grant must fail.");

	match err {
		Error::AuthenticationFailed { status, body: returned } => {
			assert_eq!(status, 401);
			assert_eq!(returned, body);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}

	assert_eq!(store.state(), TokenState::NoToken);
	assert_eq!(store.metrics().failures(), 1);
}

#[tokio::test]
async fn non_json_rejection_is_still_an_authentication_failure() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(503).body("upstream unavailable");
		})
		.await;

	let err = build_store(&server).access_token().await.expect_err("503 must fail.");

	assert!(matches!(
		err,
		Error::AuthenticationFailed { status: 503, ref body } if body == "upstream unavailable"
	));
}

#[tokio::test]
async fn missing_expires_in_is_rejected() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"no-expiry\",\"token_type\":\"Bearer\"}");
		})
		.await;

	let err = build_store(&server).access_token().await.expect_err("Token without expiry must fail.");

	assert!(matches!(err, Error::TokenResponse(TokenResponseError::MissingExpiresIn)));
}

#[tokio::test]
async fn non_json_success_body_is_a_parse_failure() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "text/html").body("<html>oops</html>");
		})
		.await;

	let store = build_store(&server);
	let err = store.access_token().await.expect_err("HTML token body must fail.");

	assert!(matches!(err, Error::TokenResponse(TokenResponseError::Parse { .. })), "{err:?}");
	assert_eq!(store.state(), TokenState::NoToken);
}

#[tokio::test]
async fn empty_success_body_is_a_parse_failure() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200).header("content-type", "application/json");
		})
		.await;

	let err = build_store(&server).access_token().await.expect_err("Empty token body must fail.");

	assert!(matches!(err, Error::TokenResponse(TokenResponseError::Parse { .. })), "{err:?}");
}
