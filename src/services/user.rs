//! Account users and the roles that grant them permissions.

// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services,
};

const USER: &str = "user";
const ROLE: &str = "role";

/// User with API or panel access.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
	/// User identifier.
	pub user_id: String,
	/// Tenant the user belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Login email.
	pub email: String,
	/// Whether the email has been verified.
	pub email_verified: bool,
	/// Whether the user may log in.
	pub enabled: bool,
	/// Whether two-factor authentication is active.
	pub totp: bool,
	/// Whether the user has full administrative rights.
	pub admin: bool,
	/// Roles granted to the user.
	pub roles: Vec<Role>,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_date: Option<OffsetDateTime>,
}

/// Body of [`UserService::create_user`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	/// Given name.
	pub first_name: String,
	/// Family name.
	pub last_name: String,
	/// Login email.
	pub email: String,
	/// Whether the user may log in.
	pub enabled: bool,
	/// Whether the user has full administrative rights.
	pub admin: bool,
	/// Role IDs to grant.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub roles: Vec<i64>,
}

/// Body of [`UserService::update_user`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchUserRequest {
	/// New given name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	/// New family name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub last_name: Option<String>,
	/// New login email.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Enables or disables login.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,
	/// Grants or revokes administrative rights.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin: Option<bool>,
	/// Replacement role IDs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub roles: Option<Vec<i64>>,
}

/// Named permission set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Role {
	/// Numeric role identifier.
	pub role_id: i64,
	/// Tenant the role belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Role name.
	pub name: String,
	/// Whether the role grants full administrative rights.
	pub admin: bool,
	/// Whether the role covers every resource regardless of tags.
	pub access_all_resources: bool,
	/// `apiPermission` or `resourcePermission`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_date: Option<OffsetDateTime>,
}

/// Body of [`UserService::create_role`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRoleRequest {
	/// Role name.
	pub name: String,
	/// Whether the role grants full administrative rights.
	pub admin: bool,
	/// Whether the role covers every resource regardless of tags.
	pub access_all_resources: bool,
	/// `apiPermission` or `resourcePermission`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Permission grants keyed by API name.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub permissions: BTreeMap<String, String>,
	/// Tags whose resources the role covers.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub tag_ids: Vec<i64>,
}

/// Body of [`UserService::update_role`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRoleRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Grants or revokes administrative rights.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub admin: Option<bool>,
	/// Widens or narrows the role to every resource.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub access_all_resources: Option<bool>,
	/// Replacement permission grants.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub permissions: Option<BTreeMap<String, String>>,
	/// Replacement tag IDs.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub tag_ids: Option<Vec<i64>>,
}

/// Users under `/v1/users` and roles under `/v1/roles`.
#[derive(Debug)]
pub struct UserService<R> {
	requester: Arc<R>,
}
impl<R> UserService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists users.
	pub async fn list_users(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<User>> {
		let path = format!("/v1/users{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one user.
	pub async fn get_user(&self, ctx: &CallContext, user_id: &str) -> Result<User> {
		services::first(self.requester.get(ctx, &format!("/v1/users/{user_id}")).await?, USER)
	}

	/// Invites a new user.
	pub async fn create_user(&self, ctx: &CallContext, request: &CreateUserRequest) -> Result<User> {
		let created: Option<DataEnvelope<User>> =
			self.requester.post(ctx, "/v1/users", Some(request)).await?;

		services::first(created, USER)
	}

	/// Updates a user.
	pub async fn update_user(
		&self,
		ctx: &CallContext,
		user_id: &str,
		request: &PatchUserRequest,
	) -> Result<User> {
		let path = format!("/v1/users/{user_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, USER)
	}

	/// Deletes a user.
	pub async fn delete_user(&self, ctx: &CallContext, user_id: &str) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/users/{user_id}")).await
	}

	/// Lists roles.
	pub async fn list_roles(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<Role>> {
		let path = format!("/v1/roles{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one role.
	pub async fn get_role(&self, ctx: &CallContext, role_id: i64) -> Result<Role> {
		services::first(self.requester.get(ctx, &format!("/v1/roles/{role_id}")).await?, ROLE)
	}

	/// Creates a role.
	pub async fn create_role(&self, ctx: &CallContext, request: &CreateRoleRequest) -> Result<Role> {
		let created: Option<DataEnvelope<Role>> =
			self.requester.post(ctx, "/v1/roles", Some(request)).await?;

		services::first(created, ROLE)
	}

	/// Updates a role.
	pub async fn update_role(
		&self,
		ctx: &CallContext,
		role_id: i64,
		request: &PatchRoleRequest,
	) -> Result<Role> {
		let path = format!("/v1/roles/{role_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, ROLE)
	}

	/// Deletes a role.
	pub async fn delete_role(&self, ctx: &CallContext, role_id: i64) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/roles/{role_id}")).await
	}
}
impl<R> Clone for UserService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}
