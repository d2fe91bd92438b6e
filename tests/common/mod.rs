#![allow(dead_code)]

// crates.io
use httpmock::MockServer;
use twipla_3as::{Client, ClientConfig, url::Url};

pub const PARTNER_ID: &str = "d71ff306-f21e-4124-bf54-9b75148516e5";
pub const PRIVATE_KEY: &str = include_str!("../fixtures/partner_rsa.pem");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/partner_rsa.pub.pem");

/// Builds a client whose base URL points at the mock server.
pub fn client_for(server: &MockServer) -> Client {
	client_at(&server.base_url())
}

/// Builds a client against an arbitrary base URL.
pub fn client_at(base_url: &str) -> Client {
	let base_url = Url::parse(base_url).expect("Base URL should parse successfully.");

	Client::new(ClientConfig::new(PARTNER_ID, PRIVATE_KEY).base_url(base_url))
		.expect("Fixture configuration should build a client.")
}

/// Wraps `payload` in a success envelope with zero-valued metadata.
pub fn envelope(payload: serde_json::Value) -> String {
	serde_json::json!({
		"payload": payload,
		"meta": { "page": 0, "pageSize": 0, "pageTotal": 0, "total": 0 }
	})
	.to_string()
}
