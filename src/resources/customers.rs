//! Customers (INTPCs) of the integration partner.

// self
use crate::{
	_prelude::*,
	envelope::{Pagination, PaginationMetadata},
	http::{Client, RequestBody, RequestContext},
	resources,
};

const CUSTOMERS: &str = "/v2/3as/customers";

/// Subscription model configured for the partner.
///
/// There is no default; every customer creation names its model explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubscriptionType {
	/// One subscription per website.
	#[serde(rename = "website")]
	Website,
	/// One subscription and credit pool per customer.
	#[serde(rename = "intpc")]
	Customer,
}

/// Customer record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
	/// Internal 3AS UUID.
	pub id: String,
	/// The partner's own identifier for the customer.
	#[serde(alias = "intpCustomerID")]
	pub intp_customer_id: String,
	/// Internal TWIPLA UUID; usually equal to `id`, not guaranteed.
	pub visa_id: String,
	/// Contact email.
	pub email: String,
	/// Owning partner.
	pub intp_id: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

/// Input for [`Client::create_customer`].
///
/// The subscription model has to be chosen explicitly:
///
/// ```compile_fail
/// let args = twipla_3as::CreateCustomerArgs {
/// 	email: "owner@twipla.com".into(),
/// 	..Default::default()
/// };
/// ```
///
/// ```compile_fail
/// let kind = twipla_3as::SubscriptionType::default();
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateCustomerArgs {
	/// The partner's own identifier for the customer.
	pub external_customer_id: String,
	/// Contact email.
	pub email: String,
	/// Must match the subscription model configured for the partner.
	pub subscription_type: SubscriptionType,
	/// Package for the new subscription, whatever its type.
	pub package_id: String,
	/// Subscription start; defaults to now.
	pub billing_date: Option<OffsetDateTime>,
	/// The partner's own identifier for the customer's first website.
	pub external_website_id: String,
	/// Host part of the website URL, e.g. `mail.google.com`.
	pub domain: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCustomerBody<'a> {
	intp_customer_id: &'a str,
	email: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	package_id: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	billing_date: Option<OffsetDateTime>,
	website: CreateCustomerWebsite<'a>,
}
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCustomerWebsite<'a> {
	intp_website_id: &'a str,
	domain: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	package_id: Option<&'a str>,
	#[serde(skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	billing_date: Option<OffsetDateTime>,
}
impl<'a> CreateCustomerBody<'a> {
	fn new(args: &'a CreateCustomerArgs) -> Self {
		let billing_date = Some(resources::billing_timestamp(args.billing_date));
		let package_id = Some(args.package_id.as_str());
		let mut body = Self {
			intp_customer_id: &args.external_customer_id,
			email: &args.email,
			package_id: None,
			billing_date: None,
			website: CreateCustomerWebsite {
				intp_website_id: &args.external_website_id,
				domain: &args.domain,
				package_id: None,
				billing_date: None,
			},
		};

		match args.subscription_type {
			SubscriptionType::Website => {
				body.website.package_id = package_id;
				body.website.billing_date = billing_date;
			},
			SubscriptionType::Customer => {
				body.package_id = package_id;
				body.billing_date = billing_date;
			},
		}

		body
	}
}

impl Client {
	/// Creates a customer together with its first website and subscription.
	pub async fn create_customer(
		&self,
		ctx: &RequestContext,
		args: &CreateCustomerArgs,
	) -> Result<Customer> {
		let body = RequestBody::json(&CreateCustomerBody::new(args))?;

		Ok(self.send(ctx, Method::POST, CUSTOMERS, body).await?.payload)
	}

	/// Lists one page of customers.
	pub async fn customers(
		&self,
		ctx: &RequestContext,
		pagination: Pagination,
	) -> Result<(Vec<Customer>, PaginationMetadata)> {
		let envelope = self.send(ctx, Method::GET, CUSTOMERS, pagination.to_query().into()).await?;

		Ok((envelope.payload, envelope.meta))
	}

	/// Fetches a customer by the partner's own customer identifier.
	pub async fn customer(&self, ctx: &RequestContext, customer_id: &str) -> Result<Customer> {
		let path = format!("{CUSTOMERS}/{customer_id}");

		Ok(self.send(ctx, Method::GET, &path, RequestBody::Empty).await?.payload)
	}

	/// Removes a customer and its linked websites, returning the removed record.
	pub async fn delete_customer(
		&self,
		ctx: &RequestContext,
		customer_id: &str,
	) -> Result<Customer> {
		let path = format!("{CUSTOMERS}/{customer_id}");

		Ok(self.send(ctx, Method::DELETE, &path, RequestBody::Empty).await?.payload)
	}
}
