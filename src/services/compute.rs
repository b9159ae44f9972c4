//! Compute instances, their snapshots, and images.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services::{self, NO_BODY},
};

const INSTANCE: &str = "instance";
const SNAPSHOT: &str = "snapshot";
const IMAGE: &str = "image";

/// Compute instance (VPS/VDS).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Instance {
	/// Tenant the instance belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Numeric instance identifier.
	pub instance_id: i64,
	/// Host name assigned by the provider.
	pub name: String,
	/// User-chosen display name.
	pub display_name: String,
	/// Lifecycle status (`running`, `stopped`, ...).
	pub status: String,
	/// Installed image.
	pub image_id: String,
	/// Name of the installed image.
	pub image_name: String,
	/// Ordered product.
	pub product_id: String,
	/// Region slug.
	pub region: String,
	/// Data center name.
	pub data_center: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Date the contract ends, when cancelled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cancel_date: Option<String>,
	/// Public addresses.
	pub ip_config: IpConfig,
	/// MAC address of the primary interface.
	pub mac_address: String,
	/// Memory in MiB.
	pub ram_mb: f64,
	/// Virtual CPU count.
	pub cpu_cores: u32,
	/// Disk size in MiB.
	pub disk_mb: f64,
	/// Operating-system family.
	pub os_type: String,
	/// Secret IDs of the installed SSH keys.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub ssh_keys: Vec<i64>,
	/// Default login user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_user: Option<String>,
}

/// IPv4 and IPv6 configuration of an instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpConfig {
	/// IPv4 settings.
	pub v4: IpAddressConfig,
	/// IPv6 settings.
	pub v6: IpAddressConfig,
}

/// Address, gateway, and netmask of one IP family.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IpAddressConfig {
	/// Assigned address.
	pub ip: String,
	/// Default gateway.
	pub gateway: String,
	/// Netmask or prefix length.
	pub netmask: String,
}

/// Body of [`ComputeService::create_instance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstanceRequest {
	/// Image to install.
	pub image_id: String,
	/// Product to order.
	pub product_id: String,
	/// Region slug.
	pub region: String,
	/// Secret IDs of SSH keys to install.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub ssh_keys: Vec<i64>,
	/// Secret ID holding the root password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub root_password: Option<i64>,
	/// Cloud-init user data.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_data: Option<String>,
	/// Additional license to bundle.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub license: Option<String>,
	/// Contract period in months.
	pub period: i64,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// Default login user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_user: Option<String>,
	/// Add-on services.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub add_ons: Option<AddOns>,
	/// Application to preinstall.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub application_id: Option<String>,
}

/// Additional services ordered with an instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddOns {
	/// Private networking add-on.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub private_networking: Option<PrivateNetworkingAddOn>,
}

/// Private networking add-on toggle.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PrivateNetworkingAddOn {
	/// Whether the add-on is ordered.
	pub enabled: bool,
}

/// Body of [`ComputeService::update_instance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchInstanceRequest {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

/// Body of [`ComputeService::upgrade_instance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInstanceRequest {
	/// Target product.
	pub product_id: String,
}

/// Body of [`ComputeService::reinstall_instance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReinstallInstanceRequest {
	/// Image to install.
	pub image_id: String,
	/// Secret IDs of SSH keys to install.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub ssh_keys: Vec<i64>,
	/// Secret ID holding the root password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub root_password: Option<i64>,
	/// Cloud-init user data.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_data: Option<String>,
	/// Default login user.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub default_user: Option<String>,
}

/// Body of [`ComputeService::rescue_instance`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueInstanceRequest {
	/// Secret ID holding the rescue root password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub root_password: Option<i64>,
	/// Secret IDs of SSH keys for the rescue system.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub ssh_keys: Vec<i64>,
	/// Cloud-init user data.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub user_data: Option<String>,
}

/// Body of [`ComputeService::reset_password`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
	/// Secret ID holding the new root password.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub root_password: Option<i64>,
}

/// Point-in-time snapshot of an instance.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Snapshot {
	/// Tenant the snapshot belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Snapshot identifier.
	pub snapshot_id: String,
	/// Instance the snapshot was taken from.
	pub instance_id: i64,
	/// Snapshot name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Whether the provider deletes the snapshot automatically.
	pub auto_delete: bool,
}

/// Body of [`ComputeService::create_snapshot`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateSnapshotRequest {
	/// Snapshot name.
	pub name: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Body of [`ComputeService::update_snapshot`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchSnapshotRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Standard or custom operating-system image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Image {
	/// Image identifier.
	pub image_id: String,
	/// Tenant the image belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Image name.
	pub name: String,
	/// Free-form description.
	pub description: String,
	/// Download URL of a custom image.
	pub url: String,
	/// Image size in MiB.
	pub size_mb: f64,
	/// Bytes uploaded so far, in MiB.
	pub uploaded_size_mb: f64,
	/// Operating-system family.
	pub os_type: String,
	/// Operating-system version.
	pub version: String,
	/// Disk format.
	pub format: String,
	/// Processing status.
	pub status: String,
	/// Failure reason reported by the provider.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
	/// Whether this is a provider-maintained image.
	pub standard_image: bool,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub last_modified_date: Option<OffsetDateTime>,
}

/// Body of [`ComputeService::create_image`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateImageRequest {
	/// Image name.
	pub name: String,
	/// Free-form description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
	/// Download URL.
	pub url: String,
	/// Operating-system family.
	pub os_type: String,
	/// Operating-system version.
	pub version: String,
}

/// Body of [`ComputeService::update_image`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchImageRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New description.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

/// Instances, snapshots, and images under `/v1/compute`.
#[derive(Debug)]
pub struct ComputeService<R> {
	requester: Arc<R>,
}
impl<R> ComputeService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists instances.
	pub async fn list_instances(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<Instance>> {
		let path = format!("/v1/compute/instances{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one instance.
	pub async fn get_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<Instance> {
		let path = format!("/v1/compute/instances/{instance_id}");

		services::first(self.requester.get(ctx, &path).await?, INSTANCE)
	}

	/// Orders a new instance.
	pub async fn create_instance(
		&self,
		ctx: &CallContext,
		request: &CreateInstanceRequest,
	) -> Result<Instance> {
		let created: Option<DataEnvelope<Instance>> =
			self.requester.post(ctx, "/v1/compute/instances", Some(request)).await?;

		services::first(created, INSTANCE)
	}

	/// Updates instance metadata (`PATCH`).
	pub async fn update_instance(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &PatchInstanceRequest,
	) -> Result<Instance> {
		let path = format!("/v1/compute/instances/{instance_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, INSTANCE)
	}

	/// Reinstalls an instance with a new image (`PUT`).
	pub async fn reinstall_instance(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &ReinstallInstanceRequest,
	) -> Result<Instance> {
		let path = format!("/v1/compute/instances/{instance_id}");

		services::first(self.requester.put(ctx, &path, Some(request)).await?, INSTANCE)
	}

	/// Cancels an instance contract.
	pub async fn cancel_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<()> {
		self.action(ctx, &format!("/v1/compute/instances/{instance_id}/cancel"), NO_BODY).await
	}

	/// Moves an instance to a different product.
	pub async fn upgrade_instance(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &UpgradeInstanceRequest,
	) -> Result<Instance> {
		let path = format!("/v1/compute/instances/{instance_id}/upgrade");

		services::first(self.requester.post(ctx, &path, Some(request)).await?, INSTANCE)
	}

	/// Starts a stopped instance.
	pub async fn start_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<()> {
		self.instance_action(ctx, instance_id, "start", NO_BODY).await
	}

	/// Stops a running instance.
	pub async fn stop_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<()> {
		self.instance_action(ctx, instance_id, "stop", NO_BODY).await
	}

	/// Restarts an instance.
	pub async fn restart_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<()> {
		self.instance_action(ctx, instance_id, "restart", NO_BODY).await
	}

	/// Gracefully shuts down an instance.
	pub async fn shutdown_instance(&self, ctx: &CallContext, instance_id: i64) -> Result<()> {
		self.instance_action(ctx, instance_id, "shutdown", NO_BODY).await
	}

	/// Boots an instance into rescue mode.
	pub async fn rescue_instance(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &RescueInstanceRequest,
	) -> Result<()> {
		self.instance_action(ctx, instance_id, "rescue", Some(request)).await
	}

	/// Resets the root password of an instance.
	pub async fn reset_password(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &ResetPasswordRequest,
	) -> Result<()> {
		self.instance_action(ctx, instance_id, "resetPassword", Some(request)).await
	}

	/// Lists the snapshots of an instance.
	pub async fn list_snapshots(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		options: &ListOptions,
	) -> Result<ListResponse<Snapshot>> {
		let path = format!("/v1/compute/instances/{instance_id}/snapshots{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one snapshot.
	pub async fn get_snapshot(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		snapshot_id: &str,
	) -> Result<Snapshot> {
		let path = format!("/v1/compute/instances/{instance_id}/snapshots/{snapshot_id}");

		services::first(self.requester.get(ctx, &path).await?, SNAPSHOT)
	}

	/// Takes a snapshot of an instance.
	pub async fn create_snapshot(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		request: &CreateSnapshotRequest,
	) -> Result<Snapshot> {
		let path = format!("/v1/compute/instances/{instance_id}/snapshots");

		services::first(self.requester.post(ctx, &path, Some(request)).await?, SNAPSHOT)
	}

	/// Renames or re-describes a snapshot.
	pub async fn update_snapshot(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		snapshot_id: &str,
		request: &PatchSnapshotRequest,
	) -> Result<Snapshot> {
		let path = format!("/v1/compute/instances/{instance_id}/snapshots/{snapshot_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, SNAPSHOT)
	}

	/// Deletes a snapshot.
	pub async fn delete_snapshot(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		snapshot_id: &str,
	) -> Result<()> {
		let path = format!("/v1/compute/instances/{instance_id}/snapshots/{snapshot_id}");

		self.requester.delete(ctx, &path).await
	}

	/// Rolls an instance back to a snapshot and returns the instance.
	pub async fn rollback_snapshot(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		snapshot_id: &str,
	) -> Result<Instance> {
		let path =
			format!("/v1/compute/instances/{instance_id}/snapshots/{snapshot_id}/rollback");

		services::first(self.requester.post(ctx, &path, NO_BODY).await?, INSTANCE)
	}

	/// Lists images; `standard_image` filters standard (`true`) or custom (`false`) images.
	pub async fn list_images(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
		standard_image: Option<bool>,
	) -> Result<ListResponse<Image>> {
		let standard_image = standard_image.map(|flag| flag.to_string()).unwrap_or_default();
		let query = options.query_with(&[("standardImage", standard_image.as_str())]);
		let path = format!("/v1/compute/images{query}");

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one image.
	pub async fn get_image(&self, ctx: &CallContext, image_id: &str) -> Result<Image> {
		let path = format!("/v1/compute/images/{image_id}");

		services::first(self.requester.get(ctx, &path).await?, IMAGE)
	}

	/// Registers a custom image from a download URL.
	pub async fn create_image(
		&self,
		ctx: &CallContext,
		request: &CreateImageRequest,
	) -> Result<Image> {
		let created: Option<DataEnvelope<Image>> =
			self.requester.post(ctx, "/v1/compute/images", Some(request)).await?;

		services::first(created, IMAGE)
	}

	/// Renames or re-describes a custom image.
	pub async fn update_image(
		&self,
		ctx: &CallContext,
		image_id: &str,
		request: &PatchImageRequest,
	) -> Result<Image> {
		let path = format!("/v1/compute/images/{image_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, IMAGE)
	}

	/// Deletes a custom image.
	pub async fn delete_image(&self, ctx: &CallContext, image_id: &str) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/compute/images/{image_id}")).await
	}

	async fn instance_action<B>(
		&self,
		ctx: &CallContext,
		instance_id: i64,
		action: &str,
		body: Option<&B>,
	) -> Result<()>
	where
		B: Serialize + Sync,
	{
		self.action(ctx, &format!("/v1/compute/instances/{instance_id}/actions/{action}"), body)
			.await
	}

	async fn action<B>(&self, ctx: &CallContext, path: &str, body: Option<&B>) -> Result<()>
	where
		B: Serialize + Sync,
	{
		self.requester.post::<B, IgnoredAny>(ctx, path, body).await.map(|_| ())
	}
}
impl<R> Clone for ComputeService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}
