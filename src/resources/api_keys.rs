//! API keys scoped to a website.

// self
use crate::{
	_prelude::*,
	http::{Client, RequestBody, RequestContext},
	resources,
};

/// API key record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiKey {
	/// Key identifier.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Secret value; only returned once, on creation.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
	/// Free-form comment.
	pub comment: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Expiry time; `None` for keys that never expire.
	#[serde(with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// The partner's own identifier for the website.
	pub intp_website_id: String,
	/// The partner's own identifier for the owning customer.
	pub intp_customer_id: String,
}

/// Input for [`Client::create_api_key`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateApiKeyArgs {
	/// The partner's own identifier for the website.
	pub external_website_id: String,
	/// Display name.
	pub name: String,
	/// Free-form comment.
	pub comment: Option<String>,
	/// Expiry time; omitted for keys that never expire.
	pub expires_at: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateApiKeyBody<'a> {
	name: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	comment: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	expires_at: Option<OffsetDateTime>,
}
impl<'a> From<&'a CreateApiKeyArgs> for CreateApiKeyBody<'a> {
	fn from(args: &'a CreateApiKeyArgs) -> Self {
		Self {
			name: &args.name,
			comment: args.comment.as_deref(),
			expires_at: args.expires_at.map(|at| resources::billing_timestamp(Some(at))),
		}
	}
}

fn api_keys_path(website_id: &str) -> String {
	format!("/v2/3as/websites/{website_id}/api-keys")
}

impl Client {
	/// Creates an API key; the returned record is the only one carrying the secret.
	pub async fn create_api_key(
		&self,
		ctx: &RequestContext,
		args: &CreateApiKeyArgs,
	) -> Result<ApiKey> {
		let path = api_keys_path(&args.external_website_id);
		let body = RequestBody::json(&CreateApiKeyBody::from(args))?;

		Ok(self.send(ctx, Method::POST, &path, body).await?.payload)
	}

	/// Lists the API keys of a website.
	pub async fn api_keys(&self, ctx: &RequestContext, website_id: &str) -> Result<Vec<ApiKey>> {
		let path = api_keys_path(website_id);

		Ok(self.send(ctx, Method::GET, &path, RequestBody::Empty).await?.payload)
	}

	/// Revokes an API key.
	pub async fn delete_api_key(
		&self,
		ctx: &RequestContext,
		website_id: &str,
		key_id: &str,
	) -> Result<()> {
		let path = format!("{}/{key_id}", api_keys_path(website_id));

		self.send::<serde_json::Value>(ctx, Method::DELETE, &path, RequestBody::Empty).await?;

		Ok(())
	}
}
