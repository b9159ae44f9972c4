//! Tags and their assignment to resources.

// crates.io
use serde::de::IgnoredAny;
// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services::{self, NO_BODY},
};

const TAG: &str = "tag";

/// Resource label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
	/// Numeric tag identifier.
	pub tag_id: i64,
	/// Tenant the tag belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Tag name.
	pub name: String,
	/// Display color (`#rrggbb`).
	pub color: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_date: Option<OffsetDateTime>,
}

/// Body of [`TagService::create_tag`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CreateTagRequest {
	/// Tag name.
	pub name: String,
	/// Display color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

/// Body of [`TagService::update_tag`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchTagRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New color.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
}

/// Tags under `/v1/tags`.
#[derive(Debug)]
pub struct TagService<R> {
	requester: Arc<R>,
}
impl<R> TagService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists tags.
	pub async fn list_tags(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<Tag>> {
		let path = format!("/v1/tags{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one tag.
	pub async fn get_tag(&self, ctx: &CallContext, tag_id: i64) -> Result<Tag> {
		services::first(self.requester.get(ctx, &format!("/v1/tags/{tag_id}")).await?, TAG)
	}

	/// Creates a tag.
	pub async fn create_tag(&self, ctx: &CallContext, request: &CreateTagRequest) -> Result<Tag> {
		let created: Option<DataEnvelope<Tag>> =
			self.requester.post(ctx, "/v1/tags", Some(request)).await?;

		services::first(created, TAG)
	}

	/// Renames or recolors a tag.
	pub async fn update_tag(
		&self,
		ctx: &CallContext,
		tag_id: i64,
		request: &PatchTagRequest,
	) -> Result<Tag> {
		let path = format!("/v1/tags/{tag_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, TAG)
	}

	/// Deletes a tag.
	pub async fn delete_tag(&self, ctx: &CallContext, tag_id: i64) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/tags/{tag_id}")).await
	}

	/// Attaches a tag to a resource such as `instance` or `image`.
	pub async fn assign_tag(
		&self,
		ctx: &CallContext,
		tag_id: i64,
		resource_type: &str,
		resource_id: &str,
	) -> Result<()> {
		let path = assignment_path(tag_id, resource_type, resource_id);

		self.requester.put::<_, IgnoredAny>(ctx, &path, NO_BODY).await.map(|_| ())
	}

	/// Detaches a tag from a resource.
	pub async fn unassign_tag(
		&self,
		ctx: &CallContext,
		tag_id: i64,
		resource_type: &str,
		resource_id: &str,
	) -> Result<()> {
		self.requester.delete(ctx, &assignment_path(tag_id, resource_type, resource_id)).await
	}
}
impl<R> Clone for TagService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}

fn assignment_path(tag_id: i64, resource_type: &str, resource_id: &str) -> String {
	format!("/v1/tags/{tag_id}/assignments/{resource_type}/{resource_id}")
}
