//! Domains whitelisted for a website's tracking script.

// self
use crate::{
	_prelude::*,
	http::{Client, RequestBody, RequestContext},
};

#[derive(Debug, Serialize)]
struct DomainBody<'a> {
	domain: &'a str,
}

fn domains_path(website_id: &str) -> String {
	format!("/v2/3as/websites/{website_id}/whitelisted-domains")
}

impl Client {
	/// Whitelists `domain` for a website.
	pub async fn add_whitelisted_domain(
		&self,
		ctx: &RequestContext,
		website_id: &str,
		domain: &str,
	) -> Result<()> {
		let body = RequestBody::json(&DomainBody { domain })?;

		self.send::<serde_json::Value>(ctx, Method::POST, &domains_path(website_id), body).await?;

		Ok(())
	}

	/// Removes `domain` from a website's whitelist.
	///
	/// The API models removal as a `PATCH` on the collection, not a `DELETE`.
	pub async fn remove_whitelisted_domain(
		&self,
		ctx: &RequestContext,
		website_id: &str,
		domain: &str,
	) -> Result<()> {
		let body = RequestBody::json(&DomainBody { domain })?;

		self.send::<serde_json::Value>(ctx, Method::PATCH, &domains_path(website_id), body).await?;

		Ok(())
	}

	/// Lists a website's whitelisted domains.
	pub async fn whitelisted_domains(
		&self,
		ctx: &RequestContext,
		website_id: &str,
	) -> Result<Vec<String>> {
		Ok(self
			.send(ctx, Method::GET, &domains_path(website_id), RequestBody::Empty)
			.await?
			.payload)
	}
}
