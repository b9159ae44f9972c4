//! Stored secrets (SSH keys and passwords) referenced by instance operations.

// self
use crate::{
	_prelude::*,
	api::{ApiRequester, DataEnvelope, ListOptions, ListResponse},
	client::CallContext,
	services,
};

const SECRET: &str = "secret";

/// Kind of value a [`Secret`] holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecretType {
	/// Public SSH key.
	#[default]
	Ssh,
	/// Password.
	Password,
}

/// Stored secret.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Secret {
	/// Numeric secret identifier.
	pub secret_id: i64,
	/// Tenant the secret belongs to.
	pub tenant_id: String,
	/// Customer account number.
	pub customer_id: String,
	/// Secret name.
	pub name: String,
	/// Kind of value stored.
	#[serde(rename = "type")]
	pub kind: SecretType,
	/// Stored value.
	pub value: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_date: Option<OffsetDateTime>,
	/// Last modification time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub updated_date: Option<OffsetDateTime>,
}
impl Debug for Secret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Secret")
			.field("secret_id", &self.secret_id)
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("value", &"<redacted>")
			.finish_non_exhaustive()
	}
}

/// Body of [`SecretService::create_secret`].
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CreateSecretRequest {
	/// Secret name.
	pub name: String,
	/// Kind of value stored.
	#[serde(rename = "type")]
	pub kind: SecretType,
	/// Value to store.
	pub value: String,
}
impl Debug for CreateSecretRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CreateSecretRequest")
			.field("name", &self.name)
			.field("kind", &self.kind)
			.field("value", &"<redacted>")
			.finish()
	}
}

/// Body of [`SecretService::update_secret`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PatchSecretRequest {
	/// New name.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// New value.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
}

/// Secrets under `/v1/secrets`.
#[derive(Debug)]
pub struct SecretService<R> {
	requester: Arc<R>,
}
impl<R> SecretService<R>
where
	R: ApiRequester,
{
	/// Creates a service over `requester`.
	pub fn new(requester: Arc<R>) -> Self {
		Self { requester }
	}

	/// Lists secrets.
	pub async fn list_secrets(
		&self,
		ctx: &CallContext,
		options: &ListOptions,
	) -> Result<ListResponse<Secret>> {
		let path = format!("/v1/secrets{}", options.to_query());

		Ok(services::page(self.requester.get(ctx, &path).await?))
	}

	/// Fetches one secret.
	pub async fn get_secret(&self, ctx: &CallContext, secret_id: i64) -> Result<Secret> {
		services::first(self.requester.get(ctx, &format!("/v1/secrets/{secret_id}")).await?, SECRET)
	}

	/// Stores a new secret.
	pub async fn create_secret(
		&self,
		ctx: &CallContext,
		request: &CreateSecretRequest,
	) -> Result<Secret> {
		let created: Option<DataEnvelope<Secret>> =
			self.requester.post(ctx, "/v1/secrets", Some(request)).await?;

		services::first(created, SECRET)
	}

	/// Renames a secret or replaces its value.
	pub async fn update_secret(
		&self,
		ctx: &CallContext,
		secret_id: i64,
		request: &PatchSecretRequest,
	) -> Result<Secret> {
		let path = format!("/v1/secrets/{secret_id}");

		services::first(self.requester.patch(ctx, &path, Some(request)).await?, SECRET)
	}

	/// Deletes a secret.
	pub async fn delete_secret(&self, ctx: &CallContext, secret_id: i64) -> Result<()> {
		self.requester.delete(ctx, &format!("/v1/secrets/{secret_id}")).await
	}
}
impl<R> Clone for SecretService<R> {
	fn clone(&self) -> Self {
		Self { requester: self.requester.clone() }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn debug_redacts_secret_values() {
		let request = CreateSecretRequest {
			name: "deploy".into(),
			kind: SecretType::Password,
			value: "hunter2".into(),
		};

		assert!(!format!("{request:?}").contains("hunter2"));
		assert_eq!(
			serde_json::to_value(&request).expect("Create request should serialize."),
			serde_json::json!({ "name": "deploy", "type": "password", "value": "hunter2" })
		);

		let secret: Secret =
			serde_json::from_str(r#"{"secretId":9,"type":"ssh","value":"ssh-ed25519 AAAA"}"#)
				.expect("Secret should decode.");

		assert_eq!(secret.kind, SecretType::Ssh);
		assert!(!format!("{secret:?}").contains("AAAA"));
	}
}
