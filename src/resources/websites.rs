//! Websites owned by the partner's customers.

// self
use crate::{
	_prelude::*,
	envelope::{Pagination, PaginationMetadata},
	http::{Client, RequestBody, RequestContext},
	resources::{self, Period},
};

const WEBSITES: &str = "/v2/3as/websites";
const WEBSITES_V3: &str = "/v3/3as/websites";

/// Subscription state of a website.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionState {
	/// Subscription is running.
	Active,
	/// Subscription was cancelled and ends with the current period.
	Canceled,
	/// Subscription is deactivated.
	Inactive,
	/// Any state this client does not know yet.
	#[serde(other)]
	Unknown,
}

/// Website record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Website {
	/// Internal 3AS UUID.
	pub id: String,
	/// The partner's own identifier for the website.
	pub intp_website_id: String,
	/// Internal TWIPLA customer UUID.
	pub visa_customer_id: String,
	/// The partner's own identifier for the owning customer.
	pub intp_customer_id: String,
	/// Owning partner.
	pub intp_id: String,
	/// Subscription state.
	pub status: Option<SubscriptionState>,
	/// Host part of the website URL.
	pub domain: String,
	/// Current package.
	pub package_id: String,
	/// Display name of the current package.
	pub package_name: String,
	/// Billing period of the current package.
	pub billing_interval: Option<Period>,
	/// Billing mode reported by the platform.
	pub billing_mode: String,
	/// Last upgrade or downgrade.
	#[serde(with = "time::serde::rfc3339::option")]
	pub last_package_change_at: Option<OffsetDateTime>,
	/// Whether the subscription is currently in trial.
	pub in_trial: bool,
	/// Whether the subscription ever had a trial.
	pub had_trial: bool,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// End of the current subscription period.
	#[serde(with = "time::serde::rfc3339::option")]
	pub expires_at: Option<OffsetDateTime>,
	/// Next touchpoint quota reset.
	#[serde(with = "time::serde::rfc3339::option")]
	pub stp_reset_at: Option<OffsetDateTime>,
}

/// Input for [`Client::create_website`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CreateWebsiteArgs {
	/// The partner's own identifier for the website.
	pub external_website_id: String,
	/// The partner's own identifier for the owning customer.
	pub external_customer_id: String,
	/// Host part of the website URL, e.g. `mail.google.com`.
	pub domain: String,
	/// Package for a website subscription; leave `None` under customer subscriptions.
	pub package_id: Option<String>,
	/// Subscription start; defaults to now.
	pub billing_date: Option<OffsetDateTime>,
	/// Enables the first-time-user experience on the website's dashboard.
	pub uft: bool,
}

#[derive(Debug, Serialize)]
struct CreateWebsiteBody<'a> {
	website: NewWebsite<'a>,
	intpc: Reference<'a>,
	opts: WebsiteOptions,
}
#[derive(Debug, Serialize)]
struct NewWebsite<'a> {
	id: &'a str,
	domain: &'a str,
	package: NewWebsitePackage<'a>,
}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewWebsitePackage<'a> {
	id: &'a str,
	#[serde(with = "time::serde::rfc3339")]
	billing_date: OffsetDateTime,
}
#[derive(Debug, Serialize)]
struct Reference<'a> {
	id: &'a str,
}
#[derive(Debug, Serialize)]
struct WebsiteOptions {
	uft: bool,
}
impl<'a> CreateWebsiteBody<'a> {
	fn new(args: &'a CreateWebsiteArgs) -> Self {
		Self {
			website: NewWebsite {
				id: &args.external_website_id,
				domain: &args.domain,
				package: NewWebsitePackage {
					id: args.package_id.as_deref().unwrap_or_default(),
					billing_date: resources::billing_timestamp(args.billing_date),
				},
			},
			intpc: Reference { id: &args.external_customer_id },
			opts: WebsiteOptions { uft: args.uft },
		}
	}
}

impl Client {
	/// Adds a website to an existing customer.
	pub async fn create_website(&self, ctx: &RequestContext, args: &CreateWebsiteArgs) -> Result<()> {
		let body = RequestBody::json(&CreateWebsiteBody::new(args))?;

		self.send::<serde_json::Value>(ctx, Method::POST, WEBSITES_V3, body).await?;

		Ok(())
	}

	/// Lists one page of all the partner's websites.
	pub async fn websites(
		&self,
		ctx: &RequestContext,
		pagination: Pagination,
	) -> Result<(Vec<Website>, PaginationMetadata)> {
		self.list_websites(ctx, None, pagination).await
	}

	/// Lists one page of the websites owned by one customer.
	pub async fn customer_websites(
		&self,
		ctx: &RequestContext,
		external_customer_id: &str,
		pagination: Pagination,
	) -> Result<(Vec<Website>, PaginationMetadata)> {
		self.list_websites(ctx, Some(external_customer_id), pagination).await
	}

	/// Fetches a website by the partner's own website identifier.
	pub async fn website(&self, ctx: &RequestContext, website_id: &str) -> Result<Website> {
		let path = format!("{WEBSITES}/{website_id}");

		Ok(self.send(ctx, Method::GET, &path, RequestBody::Empty).await?.payload)
	}

	/// Removes a website.
	pub async fn delete_website(&self, ctx: &RequestContext, website_id: &str) -> Result<()> {
		let path = format!("{WEBSITES}/{website_id}");

		self.send::<serde_json::Value>(ctx, Method::DELETE, &path, RequestBody::Empty).await?;

		Ok(())
	}

	async fn list_websites(
		&self,
		ctx: &RequestContext,
		external_customer_id: Option<&str>,
		pagination: Pagination,
	) -> Result<(Vec<Website>, PaginationMetadata)> {
		let mut query = pagination.to_query();

		if let Some(id) = external_customer_id.filter(|id| !id.is_empty()) {
			query.set("externalCustomerId", id);
		}

		let envelope = self.send(ctx, Method::GET, WEBSITES, query.into()).await?;

		Ok((envelope.payload, envelope.meta))
	}
}
