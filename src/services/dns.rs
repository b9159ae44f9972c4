//! DNS zones, zone records, and reverse (PTR) records.

// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services,
};

const ZONE: &str = "zone";
const RECORD: &str = "record";
const PTR_RECORD: &str = "PTR record";

/// Hosted DNS zone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Zone {
	/// Zone identifier.
	pub zone_id: String,
	/// Tenant the zone belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Fully qualified zone name.
	pub name: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_date: Option<OffsetDateTime>,
}

/// Body of [`DnsService::create_zone`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateZoneRequest {
	/// Fully qualified zone name.
	pub name: String,
}

/// Resource record inside a zone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Record {
	/// Record identifier.
	pub record_id: String,
	/// Tenant the record belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Owner name relative to the zone.
	pub name: String,
	/// Record type (`A`, `AAAA`, `MX`, ...).
	#[serde(rename = "type")]
	pub kind: String,
	/// Record data.
	pub content: String,
	/// Time to live in seconds.
	pub ttl: u32,
	/// Priority for `MX` and `SRV` records.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u32>,
}

/// Body of [`DnsService::create_record`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateRecordRequest {
	/// Owner name relative to the zone.
	pub name: String,
	/// Record type.
	#[serde(rename = "type")]
	pub kind: String,
	/// Record data.
	pub content: String,
	/// Time to live in seconds.
	pub ttl: u32,
	/// Priority for `MX` and `SRV` records.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u32>,
}

/// Body of [`DnsService::update_record`]; unset fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchRecordRequest {
	/// New owner name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New record type.
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// New record data.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub content: Option<String>,
	/// New time to live.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub ttl: Option<u32>,
	/// New priority.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<u32>,
}

/// Reverse DNS entry of one IP address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PtrRecord {
	/// IP address the entry belongs to.
	pub ip_address: String,
	/// Tenant the entry belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Host name the address resolves to.
	pub ptr: String,
}

/// Body of [`DnsService::update_ptr_record`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchPtrRequest {
	/// Host name the address should resolve to.
	pub ptr: String,
}

/// Zones, records, and PTR entries under `/v1/dns`.
#[derive(Debug)]
pub struct DnsService<R> {
	requester: Arc<R>,
}
impl<R> DnsService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists zones.
	pub async fn list_zones(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<Zone>> {
		let path = format!("/v1/dns/zones{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one zone by name.
	pub async fn get_zone(&self, ctx: &CallContext, zone_name: &str) -> Result<Zone> {
		let path = format!("/v1/dns/zones/{zone_name}");

		services::first(self.requester.get(ctx, &path).await?, ZONE)
	}

	/// Creates a zone.
	pub async fn create_zone(&self, ctx: &CallContext, request: &CreateZoneRequest) -> Result<Zone> {
		let created: Option<DataEnvelope<Zone>> =
			self.requester.post(ctx, "/v1/dns/zones", Some(request)).await?;

		services::first(created, ZONE)
	}

	/// Deletes a zone and all of its records.
	pub async fn delete_zone(&self, ctx: &CallContext, zone_name: &str) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/dns/zones/{zone_name}")).await
	}

	/// Lists the records of a zone.
	pub async fn list_records(
		&self,
		ctx: &CallContext,
		zone_name: &str,
		options: &ListOptions,
	) -> Result<ListResponse<Record>> {
		let path = format!("/v1/dns/zones/{zone_name}/records{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one record.
	pub async fn get_record(
		&self,
		ctx: &CallContext,
		zone_name: &str,
		record_id: &str,
	) -> Result<Record> {
		let path = format!("/v1/dns/zones/{zone_name}/records/{record_id}");

		services::first(self.requester.get(ctx, &path).await?, RECORD)
	}

	/// Adds a record to a zone.
	pub async fn create_record(
		&self,
		ctx: &CallContext,
		zone_name: &str,
		request: &CreateRecordRequest,
	) -> Result<Record> {
		let path = format!("/v1/dns/zones/{zone_name}/records");

		services::first(self.requester.post(ctx, &path, Some(request)).await?, RECORD)
	}

	/// Updates a record (`PATCH`).
	pub async fn update_record(
		&self,
		ctx: &CallContext,
		zone_name: &str,
		record_id: &str,
		request: &PatchRecordRequest,
	) -> Result<Record> {
		let path = format!("/v1/dns/zones/{zone_name}/records/{record_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, RECORD)
	}

	/// Removes a record from a zone.
	pub async fn delete_record(
		&self,
		ctx: &CallContext,
		zone_name: &str,
		record_id: &str,
	) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/dns/zones/{zone_name}/records/{record_id}")).await
	}

	/// Lists PTR entries.
	pub async fn list_ptr_records(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<PtrRecord>> {
		let path = format!("/v1/dns/ptrs{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches the PTR entry of an IP address.
	pub async fn get_ptr_record(&self, ctx: &CallContext, ip_address: &str) -> Result<PtrRecord> {
		let path = format!("/v1/dns/ptrs/{ip_address}");

		services::first(self.requester.get(ctx, &path).await?, PTR_RECORD)
	}

	/// Points an IP address at a new host name.
	pub async fn update_ptr_record(
		&self,
		ctx: &CallContext,
		ip_address: &str,
		request: &PatchPtrRequest,
	) -> Result<PtrRecord> {
		let path = format!("/v1/dns/ptrs/{ip_address}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, PTR_RECORD)
	}
}
impl<R> Clone for DnsService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}
