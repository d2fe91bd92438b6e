//! Lists the partner's packages against a local mock gateway and mints a customer token for a
//! dashboard embed.

// std
use std::time::Duration;
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use twipla_3as::{Client, ClientConfig, RequestContext, url::Url};

const PRIVATE_KEY: &str = include_str!("../tests/fixtures/partner_rsa.pem");

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let packages_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/packages").header_exists("authorization");
			then.status(200).header("content-type", "application/json").body(
				"{\"payload\":[{\"id\":\"pro\",\"name\":\"Pro\",\"touchpoints\":50000,\"price\":49,\"currency\":\"EUR\",\"period\":\"monthly\"},{\"id\":\"starter\",\"name\":\"Starter\",\"touchpoints\":5000,\"price\":9,\"currency\":\"EUR\",\"period\":\"monthly\"}],\"meta\":{\"page\":0,\"pageSize\":0,\"pageTotal\":0,\"total\":0}}",
			);
		})
		.await;
	let config = ClientConfig::new("demo-partner", PRIVATE_KEY)
		.base_url(Url::parse(&server.base_url())?);
	let client = Client::new(config)?;
	let ctx = RequestContext::with_timeout(Duration::from_secs(10));

	for package in client.packages(&ctx).await? {
		println!(
			"{}: {} touchpoints for {} {:?} per {:?}.",
			package.name, package.touchpoints, package.price, package.currency, package.period
		);
	}

	let token = client.customer_access_token("demo-customer")?;

	println!("Dashboard token: {}.", token.expose());

	packages_mock.assert_async().await;

	Ok(())
}
