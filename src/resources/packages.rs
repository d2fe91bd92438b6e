//! Subscription packages offered by the partner.

// self
use crate::{
	_prelude::*,
	envelope::null_as_default,
	http::{Client, RequestBody, RequestContext},
};

const PACKAGES: &str = "/v2/3as/packages";

/// Billing currency of a package.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
	/// Euro.
	#[serde(rename = "EUR")]
	Eur,
	/// Romanian leu.
	#[serde(rename = "RON")]
	Ron,
	/// US dollar.
	#[serde(rename = "USD")]
	Usd,
	/// Empty or any currency this client does not know yet.
	#[default]
	#[serde(rename = "", other)]
	Unknown,
}

/// Billing period of a package or subscription.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
	/// Billed every month.
	Monthly,
	/// Billed every year.
	Yearly,
	/// Empty or any period this client does not know yet.
	#[default]
	#[serde(rename = "", other)]
	Unknown,
}

/// Subscription package.
///
/// Missing or `null` members decode as zero values.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Package {
	/// Package identifier.
	#[serde(deserialize_with = "null_as_default")]
	pub id: String,
	/// Creation time.
	#[serde(with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
	/// Display name.
	#[serde(deserialize_with = "null_as_default")]
	pub name: String,
	/// Price per period.
	#[serde(deserialize_with = "null_as_default")]
	pub price: f64,
	/// Price currency.
	#[serde(deserialize_with = "null_as_default")]
	pub currency: Currency,
	/// Billing period.
	#[serde(deserialize_with = "null_as_default")]
	pub period: Period,
	/// Whether the package is highlighted as recommended.
	#[serde(deserialize_with = "null_as_default")]
	pub recommended: bool,
	/// Owning partner.
	#[serde(deserialize_with = "null_as_default")]
	pub intp_id: String,
	/// Touchpoint quota per period.
	#[serde(deserialize_with = "null_as_default")]
	pub touchpoints: f64,
}

/// Input for [`Client::create_package`].
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CreatePackageArgs {
	/// Display name.
	pub name: String,
	/// Touchpoint quota per period.
	pub touchpoints: f64,
	/// Price per period.
	pub price: f64,
	/// Price currency.
	pub currency: Currency,
	/// Billing period.
	pub period: Period,
}

/// Input for [`Client::update_package`]; only the name is mutable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UpdatePackageArgs {
	/// New display name.
	pub name: String,
}

impl Client {
	/// Lists every package, ordered by ascending touchpoints.
	///
	/// The order is stable, so packages with equal touchpoints keep the server's order.
	pub async fn packages(&self, ctx: &RequestContext) -> Result<Vec<Package>> {
		let mut packages: Vec<Package> =
			self.send(ctx, Method::GET, PACKAGES, RequestBody::Empty).await?.payload;

		sort_by_touchpoints(&mut packages);

		Ok(packages)
	}

	/// Fetches a package by id.
	pub async fn package(&self, ctx: &RequestContext, package_id: &str) -> Result<Package> {
		let path = format!("{PACKAGES}/{package_id}");

		Ok(self.send(ctx, Method::GET, &path, RequestBody::Empty).await?.payload)
	}

	/// Creates a package and returns it with its server-assigned id.
	pub async fn create_package(
		&self,
		ctx: &RequestContext,
		args: &CreatePackageArgs,
	) -> Result<Package> {
		let body = RequestBody::json(args)?;

		Ok(self.send(ctx, Method::POST, PACKAGES, body).await?.payload)
	}

	/// Renames a package.
	pub async fn update_package(
		&self,
		ctx: &RequestContext,
		package_id: &str,
		args: &UpdatePackageArgs,
	) -> Result<Package> {
		let path = format!("{PACKAGES}/{package_id}");
		let body = RequestBody::json(args)?;

		Ok(self.send(ctx, Method::PATCH, &path, body).await?.payload)
	}
}

fn sort_by_touchpoints(packages: &mut [Package]) {
	packages.sort_by(|a, b| a.touchpoints.total_cmp(&b.touchpoints));
}
