//! S3-compatible object storages, their usage statistics, and access credentials.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services::{self, NO_BODY},
};

const OBJECT_STORAGE: &str = "object storage";
const STATS: &str = "object storage statistics";
const CREDENTIALS: &str = "object storage credentials";

/// Object storage subscription.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectStorage {
	/// Object storage identifier.
	pub object_storage_id: String,
	/// Tenant the storage belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Date the contract ends, when cancelled.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub cancel_date: Option<String>,
	/// Automatic growth settings.
	pub auto_scaling: AutoScaling,
	/// Data center name.
	pub data_center: String,
	/// Purchased capacity in TB.
	#[serde(rename = "totalPurchasedSpaceTB")]
	pub total_purchased_space_tb: f64,
	/// S3 endpoint.
	pub s3_url: String,
	/// S3 tenant identifier.
	pub s3_tenant_id: String,
	/// Provisioning status.
	pub status: String,
	/// Region slug.
	pub region: String,
	/// Display name.
	pub display_name: String,
}

/// Current automatic growth settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AutoScaling {
	/// `enabled`, `disabled`, or `error`.
	pub state: String,
	/// Upper capacity bound in TB.
	#[serde(rename = "sizeLimitTB")]
	pub size_limit_tb: f64,
	/// Reason for the `error` state.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_message: Option<String>,
}

/// Requested automatic growth settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AutoScalingRequest {
	/// `enabled` or `disabled`.
	pub state: String,
	/// Upper capacity bound in TB.
	#[serde(rename = "sizeLimitTB")]
	pub size_limit_tb: f64,
}

/// Body of [`StorageService::create_object_storage`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateObjectStorageRequest {
	/// Region slug.
	pub region: String,
	/// Capacity to purchase in TB.
	#[serde(rename = "totalPurchasedSpaceTB")]
	pub total_purchased_space_tb: f64,
	/// Automatic growth settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub auto_scaling: Option<AutoScalingRequest>,
	/// Display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
}

/// Body of [`StorageService::update_object_storage`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchObjectStorageRequest {
	/// New display name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// New automatic growth settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub auto_scaling: Option<AutoScalingRequest>,
}

/// Body of [`StorageService::upgrade_object_storage`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeObjectStorageRequest {
	/// New purchased capacity in TB.
	#[serde(rename = "totalPurchasedSpaceTB")]
	pub total_purchased_space_tb: f64,
	/// New automatic growth settings.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub auto_scaling: Option<AutoScalingRequest>,
}

/// Usage statistics of an object storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectStorageStats {
	/// Object storage identifier.
	pub object_storage_id: String,
	/// Space in use in TB.
	#[serde(rename = "usedSpaceTB")]
	pub used_space_tb: f64,
	/// Space in use as a percentage of purchased capacity.
	pub used_space_percentage: f64,
}

/// S3 access key pair.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ObjectStorageCredentials {
	/// Tenant the credentials belong to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// S3 access key.
	pub access_key: String,
	/// S3 secret key.
	pub secret_key: String,
	/// Display name.
	pub display_name: String,
}
impl Debug for ObjectStorageCredentials {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ObjectStorageCredentials")
			.field("access_key", &self.access_key)
			.field("secret_key", &"<redacted>")
			.field("display_name", &self.display_name)
			.finish_non_exhaustive()
	}
}

/// Object storages under `/v1/object-storages`.
#[derive(Debug)]
pub struct StorageService<R> {
	requester: Arc<R>,
}
impl<R> StorageService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists object storages.
	pub async fn list_object_storages(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<ObjectStorage>> {
		let path = format!("/v1/object-storages{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one object storage.
	pub async fn get_object_storage(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
	) -> Result<ObjectStorage> {
		let path = format!("/v1/object-storages/{object_storage_id}");

		services::first(self.requester.get(ctx, &path).await?, OBJECT_STORAGE)
	}

	/// Orders an object storage.
	pub async fn create_object_storage(
		&self,
		ctx: &CallContext,
		request: &CreateObjectStorageRequest,
	) -> Result<ObjectStorage> {
		let created: Option<DataEnvelope<ObjectStorage>> =
			self.requester.post(ctx, "/v1/object-storages", Some(request)).await?;

		services::first(created, OBJECT_STORAGE)
	}

	/// Updates the display name or automatic growth settings.
	pub async fn update_object_storage(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
		request: &PatchObjectStorageRequest,
	) -> Result<ObjectStorage> {
		let path = format!("/v1/object-storages/{object_storage_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, OBJECT_STORAGE)
	}

	/// Resizes the purchased capacity.
	pub async fn upgrade_object_storage(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
		request: &UpgradeObjectStorageRequest,
	) -> Result<ObjectStorage> {
		let path = format!("/v1/object-storages/{object_storage_id}/resize");

		services::first(self.requester.post(ctx, &path, Some(request)).await?, OBJECT_STORAGE)
	}

	/// Cancels an object storage contract.
	pub async fn cancel_object_storage(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
	) -> Result<()> {
		let path = format!("/v1/object-storages/{object_storage_id}/cancel");

		self.requester.post::<_, IgnoredAny>(ctx, &path, NO_BODY).await.map(|_| ())
	}

	/// Fetches usage statistics.
	pub async fn get_object_storage_stats(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
	) -> Result<ObjectStorageStats> {
		let path = format!("/v1/object-storages/{object_storage_id}/stats");

		services::first(self.requester.get(ctx, &path).await?, STATS)
	}

	/// Fetches the S3 credentials of an object storage.
	pub async fn get_credentials(
		&self,
		ctx: &CallContext,
		object_storage_id: &str,
	) -> Result<ObjectStorageCredentials> {
		let path = format!("/v1/users/object-storage-credentials/{object_storage_id}");

		services::first(self.requester.get(ctx, &path).await?, CREDENTIALS)
	}
}
impl<R> Clone for StorageService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn terabyte_fields_keep_wire_casing() {
		let storage: ObjectStorage = serde_json::from_str(
			r#"{"objectStorageId":"os-1","totalPurchasedSpaceTB":2.5,"autoScaling":{"state":"enabled","sizeLimitTB":4}}"#,
		)
		.expect("Object storage should decode.");

		assert_eq!(storage.total_purchased_space_tb, 2.5);
		assert_eq!(storage.auto_scaling.size_limit_tb, 4.0);

		let request = UpgradeObjectStorageRequest { total_purchased_space_tb: 3.0, auto_scaling: None };

		assert_eq!(
			serde_json::to_value(&request).expect("Upgrade request should serialize."),
			serde_json::json!({ "totalPurchasedSpaceTB": 3.0 })
		);
	}
}
