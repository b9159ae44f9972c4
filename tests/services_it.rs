// crates.io
use httpmock::prelude::*;
// self
use contabo_api::{
	api::ListOptions,
	client::{CallContext, ReqwestApiClient},
	config::{Config, Credentials},
	error::Error,
	sdk::Sdk,
	services::{
		compute::CreateInstanceRequest,
		dns::{CreateZoneRequest, PatchPtrRequest},
		network::AssignInstancesRequest,
	},
};

fn build_sdk(server: &MockServer) -> Sdk<ReqwestApiClient> {
	let credentials = Credentials::new("cli-id", "cli-secret", "api@example.com", "api-password")
		.expect("Credential fixture should be valid.");
	let config = Config::builder(credentials)
		.auth_url(server.url("/token"))
		.base_url(server.base_url())
		.build()
		.expect("Configuration fixture should be valid.");

	Sdk::new(&config).expect("SDK should build.")
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"svc\",\"token_type\":\"Bearer\",\"expires_in\":3600}");
		})
		.await
}

#[tokio::test]
async fn list_instances_sends_paging_query_and_reuses_the_token() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let list = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/compute/instances")
				.query_param("page", "2")
				.query_param("size", "5")
				.query_param("orderBy", "name:asc")
				.header("authorization", "Bearer svc");
			then.status(200).header("content-type", "application/json").body(
				r#"{
					"_pagination": {"size": 5, "totalElements": 7, "totalPages": 2, "number": 2},
					"_links": {"self": "/v1/compute/instances?page=2&size=5", "first": "/v1/compute/instances?page=1&size=5"},
					"data": [
						{"instanceId": 101, "name": "vmi101", "status": "running", "region": "EU", "createdDate": "2025-01-02T03:04:05Z", "ipConfig": {"v4": {"ip": "203.0.113.10", "gateway": "203.0.113.1", "netmask": "24"}}},
						{"instanceId": 102, "name": "vmi102", "status": "stopped"}
					]
				}"#,
			);
		})
		.await;
	let sdk = build_sdk(&server);
	let ctx = CallContext::new();
	let options = ListOptions::new().page(2).size(5).order_by("name:asc");
	let page = sdk.compute.list_instances(&ctx, &options).await.expect("List should succeed.");

	assert_eq!(page.pagination.total_elements, 7);
	assert_eq!(page.pagination.number, 2);
	assert_eq!(page.links.first.as_deref(), Some("/v1/compute/instances?page=1&size=5"));
	assert_eq!(page.data.len(), 2);
	assert_eq!(page.data[0].instance_id, 101);
	assert_eq!(page.data[0].ip_config.v4.ip, "203.0.113.10");
	assert!(page.data[0].created_date.is_some());
	assert_eq!(page.data[1].status, "stopped");

	sdk.compute.list_instances(&ctx, &options).await.expect("Second list should succeed.");

	list.assert_calls_async(2).await;
	token.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_single_item_envelope_is_not_found() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/compute/instances/404");
			then.status(200).header("content-type", "application/json").body(r#"{"data":[]}"#);
		})
		.await;

	let err = build_sdk(&server)
		.compute
		.get_instance(&CallContext::new(), 404)
		.await
		.expect_err("Empty data must be reported as not found.");

	assert!(matches!(err, Error::NotFound { resource: "instance" }));
}

#[tokio::test]
async fn create_with_empty_data_is_not_found() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/compute/instances").json_body(serde_json::json!({
				"imageId": "img-1",
				"productId": "V45",
				"region": "EU",
				"period": 1,
			}));
			then.status(201).header("content-type", "application/json").body(r#"{"data":[]}"#);
		})
		.await;

	let request = CreateInstanceRequest {
		image_id: "img-1".into(),
		product_id: "V45".into(),
		region: "EU".into(),
		period: 1,
		..Default::default()
	};
	let err = build_sdk(&server)
		.compute
		.create_instance(&CallContext::new(), &request)
		.await
		.expect_err("Create without data must fail.");

	assert!(matches!(err, Error::NotFound { resource: "instance" }));
}

#[tokio::test]
async fn instance_actions_post_without_body() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let start = server
		.mock_async(|when, then| {
			when.method(POST).path("/v1/compute/instances/7/actions/start").body("");
			then.status(201)
				.header("content-type", "application/json")
				.body(r#"{"data":[{"instanceId":7,"action":"start"}],"_links":{"self":"/v1/compute/instances/7/actions/start"}}"#);
		})
		.await;

	build_sdk(&server)
		.compute
		.start_instance(&CallContext::new(), 7)
		.await
		.expect("Start action should succeed.");

	start.assert_async().await;
}

#[tokio::test]
async fn list_images_forwards_the_standard_image_filter() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let images = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v1/compute/images")
				.query_param("size", "50")
				.query_param("standardImage", "true");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"imageId":"ubuntu-24.04","name":"ubuntu-24.04","standardImage":true,"sizeMb":1024.5}]}"#,
			);
		})
		.await;
	let page = build_sdk(&server)
		.compute
		.list_images(&CallContext::new(), &ListOptions::new().size(50), Some(true))
		.await
		.expect("Image list should succeed.");

	assert!(page.data[0].standard_image);
	assert_eq!(page.data[0].size_mb, 1024.5);

	images.assert_async().await;
}

#[tokio::test]
async fn dns_zone_create_and_ptr_update_use_the_expected_verbs() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let zone = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/dns/zones")
				.json_body(serde_json::json!({ "name": "example.com" }));
			then.status(201)
				.header("content-type", "application/json")
				.body(r#"{"data":[{"zoneId":"z-1","name":"example.com"}]}"#);
		})
		.await;
	let ptr = server
		.mock_async(|when, then| {
			when.method(PATCH)
				.path("/v1/dns/ptrs/203.0.113.10")
				.json_body(serde_json::json!({ "ptr": "mail.example.com" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":[{"ipAddress":"203.0.113.10","ptr":"mail.example.com"}]}"#);
		})
		.await;
	let sdk = build_sdk(&server);
	let ctx = CallContext::new();
	let created = sdk
		.dns
		.create_zone(&ctx, &CreateZoneRequest { name: "example.com".into() })
		.await
		.expect("Zone creation should succeed.");
	let updated = sdk
		.dns
		.update_ptr_record(&ctx, "203.0.113.10", &PatchPtrRequest { ptr: "mail.example.com".into() })
		.await
		.expect("PTR update should succeed.");

	assert_eq!(created.zone_id, "z-1");
	assert_eq!(updated.ptr, "mail.example.com");

	zone.assert_async().await;
	ptr.assert_async().await;
}

#[tokio::test]
async fn tag_assignment_puts_and_unassignment_deletes() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let assign = server
		.mock_async(|when, then| {
			when.method(PUT).path("/v1/tags/12/assignments/instance/101");
			then.status(201);
		})
		.await;
	let unassign = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/tags/12/assignments/instance/101");
			then.status(204);
		})
		.await;
	let sdk = build_sdk(&server);
	let ctx = CallContext::new();

	sdk.tag.assign_tag(&ctx, 12, "instance", "101").await.expect("Assignment should succeed.");
	sdk.tag.unassign_tag(&ctx, 12, "instance", "101").await.expect("Unassignment should succeed.");

	assign.assert_async().await;
	unassign.assert_async().await;
}

#[tokio::test]
async fn private_network_membership_round_trip() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let assign = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v1/private-networks/55/instances")
				.json_body(serde_json::json!({ "instanceIds": [101, 102] }));
			then.status(201).header("content-type", "application/json").body(r#"{"data":[]}"#);
		})
		.await;
	let unassign = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v1/private-networks/55/instances/102");
			then.status(204);
		})
		.await;
	let sdk = build_sdk(&server);
	let ctx = CallContext::new();

	sdk.network
		.assign_instances(&ctx, 55, &AssignInstancesRequest { instance_ids: vec![101, 102] })
		.await
		.expect("Assignment should succeed.");
	sdk.network.unassign_instance(&ctx, 55, 102).await.expect("Unassignment should succeed.");

	assign.assert_async().await;
	unassign.assert_async().await;
}

#[tokio::test]
async fn storage_stats_and_credentials_unwrap_their_envelopes() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/object-storages/os-1/stats");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":[{"objectStorageId":"os-1","usedSpaceTB":0.5,"usedSpacePercentage":25.0}]}"#,
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/users/object-storage-credentials/os-1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":[{"accessKey":"AK","secretKey":"SK"}]}"#);
		})
		.await;

	let sdk = build_sdk(&server);
	let ctx = CallContext::new();
	let stats =
		sdk.storage.get_object_storage_stats(&ctx, "os-1").await.expect("Stats should load.");
	let credentials =
		sdk.storage.get_credentials(&ctx, "os-1").await.expect("Credentials should load.");

	assert_eq!(stats.used_space_tb, 0.5);
	assert_eq!(stats.used_space_percentage, 25.0);
	assert_eq!(credentials.access_key, "AK");
	assert!(!format!("{credentials:?}").contains("SK"));
}

#[tokio::test]
async fn service_errors_pass_through_unchanged() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/secrets/9");
			then.status(403).body("{\"message\":\"forbidden\"}");
		})
		.await;

	let err = build_sdk(&server)
		.secret
		.get_secret(&CallContext::new().with_trace_id("t-9"), 9)
		.await
		.expect_err("403 must surface.");

	match err {
		Error::Api(api) => {
			assert_eq!(api.status, 403);
			assert_eq!(api.body, "{\"message\":\"forbidden\"}");
			assert_eq!(api.trace_id.as_deref(), Some("t-9"));
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}
