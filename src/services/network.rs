//! Private networks (VPC) and their instance membership.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services,
};

const PRIVATE_NETWORK: &str = "private network";

/// Private network spanning instances in one data center.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrivateNetwork {
	/// Numeric network identifier.
	pub private_network_id: i64,
	/// Tenant the network belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Network name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Region slug.
	pub region: String,
	/// Human-readable region name.
	pub region_name: String,
	/// Data center name.
	pub data_center: String,
	/// Number of unassigned addresses left.
	pub available_ips: i64,
	/// Address range in CIDR notation.
	pub cidr: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Attached instances.
	pub instances: Vec<NetworkMember>,
}

/// Instance attached to a private network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkMember {
	/// Attached instance.
	pub instance_id: i64,
	/// Address inside the private network.
	pub private_ip: String,
}

/// Body of [`NetworkService::create_private_network`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrivateNetworkRequest {
	/// Region slug.
	pub region: String,
	/// Network name.
	pub name: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Instances to attach on creation.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub instance_ids: Vec<i64>,
}

/// Body of [`NetworkService::update_private_network`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchPrivateNetworkRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Body of [`NetworkService::assign_instances`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignInstancesRequest {
	/// Instances to attach.
	pub instance_ids: Vec<i64>,
}

/// Private networks under `/v1/private-networks`.
#[derive(Debug)]
pub struct NetworkService<R> {
	requester: Arc<R>,
}
impl<R> NetworkService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists private networks.
	pub async fn list_private_networks(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<PrivateNetwork>> {
		let path = format!("/v1/private-networks{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one private network.
	pub async fn get_private_network(
		&self,
		ctx: &CallContext,
		private_network_id: i64,
	) -> Result<PrivateNetwork> {
		let path = format!("/v1/private-networks/{private_network_id}");

		services::first(self.requester.get(ctx, &path).await?, PRIVATE_NETWORK)
	}

	/// Creates a private network.
	pub async fn create_private_network(
		&self,
		ctx: &CallContext,
		request: &CreatePrivateNetworkRequest,
	) -> Result<PrivateNetwork> {
		let created: Option<DataEnvelope<PrivateNetwork>> =
			self.requester.post(ctx, "/v1/private-networks", Some(request)).await?;

		services::first(created, PRIVATE_NETWORK)
	}

	/// Renames or re-describes a private network.
	pub async fn update_private_network(
		&self,
		ctx: &CallContext,
		private_network_id: i64,
		request: &PatchPrivateNetworkRequest,
	) -> Result<PrivateNetwork> {
		let path = format!("/v1/private-networks/{private_network_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, PRIVATE_NETWORK)
	}

	/// Deletes a private network.
	pub async fn delete_private_network(
		&self,
		ctx: &CallContext,
		private_network_id: i64,
	) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/private-networks/{private_network_id}")).await
	}

	/// Attaches instances to a private network.
	pub async fn assign_instances(
		&self,
		ctx: &CallContext,
		private_network_id: i64,
		request: &AssignInstancesRequest,
	) -> Result<()> {
		let path = format!("/v1/private-networks/{private_network_id}/instances");

		self.requester.post::<_, IgnoredAny>(ctx, &path, Some(request)).await.map(|_| ())
	}

	/// Detaches one instance from a private network.
	pub async fn unassign_instance(
		&self,
		ctx: &CallContext,
		private_network_id: i64,
		instance_id: i64,
	) -> Result<()> {
		let path = format!("/v1/private-networks/{private_network_id}/instances/{instance_id}");

		self.requester.delete(ctx, &path).await
	}
}
impl<R> Clone for NetworkService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}
