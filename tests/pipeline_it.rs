mod common;

// std
use std::time::{Duration, Instant};
// crates.io
use httpmock::prelude::*;
use twipla_3as::{
	Claims, Client, ClientConfig, Pagination, RequestBody, RequestContext, Role, TokenSigner,
	error::{ConfigError, Error, ProtocolError, TransportError},
	reqwest::Method,
};
// self
use common::*;

#[tokio::test]
async fn listing_sends_pagination_and_bearer_without_body() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/v2/3as/customers")
				.query_param("page", "0")
				.query_param("pageSize", "10")
				.header_exists("authorization")
				.header_missing("content-type");
			then.status(200).header("content-type", "application/json").body(
				"{\"payload\":[{\"id\":\"u1\",\"intpCustomerId\":\"c1\",\"email\":\"a@twipla.com\"}],\"meta\":{\"page\":0,\"pageSize\":10,\"pageTotal\":1,\"total\":1}}",
			);
		})
		.await;
	let (customers, meta) = client_for(&server)
		.customers(&RequestContext::background(), Pagination::default())
		.await
		.expect("Customer listing should succeed.");

	mock.assert_async().await;

	assert_eq!(customers.len(), 1);
	assert_eq!(customers[0].intp_customer_id, "c1");
	assert_eq!(meta.total, 1);
	assert_eq!(meta.page_size, 10);
}

#[tokio::test]
async fn delete_omits_content_type() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/v2/3as/websites/w1").header_missing("content-type");
			then.status(200).header("content-type", "application/json").body(envelope(
				serde_json::json!({ "intpWebsiteId": "w1" }),
			));
		})
		.await;

	client_for(&server)
		.delete_website(&RequestContext::background(), "w1")
		.await
		.expect("Website deletion should succeed.");

	mock.assert_async().await;
}

#[tokio::test]
async fn invalid_access_token_is_distinguished() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/packages");
			then.status(401).header("content-type", "application/json").body(
				"{\"status\":401,\"message\":\"Unauthorized\",\"code\":0,\"error\":\"invalid access token\"}",
			);
		})
		.await;

	let err = client_for(&server)
		.packages(&RequestContext::background())
		.await
		.expect_err("Rejected token must fail the call.");

	assert!(matches!(err, Error::InvalidAccessToken), "{err:?}");
}

#[tokio::test]
async fn business_errors_keep_status_message_and_code() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/websites/missing");
			then.status(404).header("content-type", "application/json; charset=utf-8").body(
				"{\"status\":404,\"message\":\"Website not found\",\"code\":2004,\"error\":\"Not Found\"}",
			);
		})
		.await;

	let err = client_for(&server)
		.website(&RequestContext::background(), "missing")
		.await
		.expect_err("Missing website must fail the call.");

	match err {
		Error::Api(api) => {
			assert_eq!(api.status, 404);
			assert_eq!(api.message, "Website not found");
			assert_eq!(api.code, 2004);
		},
		other => panic!("Unexpected error variant: {other:?}."),
	}
}

#[tokio::test]
async fn non_json_error_body_is_reported_verbatim() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/packages");
			then.status(502).header("content-type", "text/html").body("<h1>Bad Gateway</h1>");
		})
		.await;

	let err = client_for(&server)
		.packages(&RequestContext::background())
		.await
		.expect_err("Gateway error must fail the call.");

	assert!(err.to_string().contains("<h1>Bad Gateway</h1>"));
	assert!(matches!(
		err,
		Error::Protocol(ProtocolError::NonJsonErrorResponse { status: 502, .. })
	));
}

#[tokio::test]
async fn non_json_success_body_is_rejected() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/packages/p1");
			then.status(200).header("content-type", "text/plain").body("maintenance");
		})
		.await;

	let err = client_for(&server)
		.package(&RequestContext::background(), "p1")
		.await
		.expect_err("Plain text must not decode as an envelope.");

	assert!(matches!(err, Error::Protocol(ProtocolError::UnexpectedContentType { .. })));
	assert!(err.to_string().contains("maintenance"));
}

#[tokio::test]
async fn no_content_yields_empty_payload() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/websites/w1/whitelisted-domains");
			then.status(204);
		})
		.await;

	let domains = client_for(&server)
		.whitelisted_domains(&RequestContext::background(), "w1")
		.await
		.expect("No content must not be an error.");

	assert!(domains.is_empty());
}

#[tokio::test]
async fn raw_send_decodes_into_caller_chosen_type() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/v2/3as/packages")
				.header("content-type", "application/json")
				.json_body(serde_json::json!({ "name": "Raw" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(envelope(serde_json::json!({ "id": "p9", "name": "Raw" })));
		})
		.await;

	let body = RequestBody::json(&serde_json::json!({ "name": "Raw" }))
		.expect("Raw body should serialize.");
	let envelope = client_for(&server)
		.send::<serde_json::Value>(
			&RequestContext::background(),
			Method::POST,
			"/v2/3as/packages",
			body,
		)
		.await
		.expect("Raw call should succeed.");

	assert_eq!(envelope.payload["id"], "p9");
	assert_eq!(envelope.meta.total, 0);
}

#[tokio::test]
async fn elapsed_deadline_sends_nothing() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.path("/v2/3as/packages");
			then.status(200).header("content-type", "application/json").body(envelope(
				serde_json::json!([]),
			));
		})
		.await;
	let err = client_for(&server)
		.packages(&RequestContext::with_deadline(Instant::now()))
		.await
		.expect_err("Elapsed deadline must cancel the call.");

	assert!(matches!(err, Error::Transport(TransportError::Cancelled)));

	mock.assert_calls_async(0).await;
}

#[tokio::test]
async fn in_flight_deadline_times_out() {
	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/v2/3as/packages");
			then.status(200)
				.header("content-type", "application/json")
				.body(envelope(serde_json::json!([])))
				.delay(Duration::from_secs(2));
		})
		.await;

	let err = client_for(&server)
		.packages(&RequestContext::with_timeout(Duration::from_millis(100)))
		.await
		.expect_err("Slow response must exceed the deadline.");

	assert!(matches!(err, Error::Transport(TransportError::Timeout { .. })), "{err:?}");
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
	let err = client_at("http://127.0.0.1:9/")
		.packages(&RequestContext::background())
		.await
		.expect_err("Closed port must fail the call.");

	assert!(matches!(err, Error::Transport(TransportError::Network { .. })), "{err:?}");
}

#[test]
fn customer_tokens_verify_against_public_key() {
	let token = client_at("http://127.0.0.1:9/")
		.customer_access_token("first_test_01")
		.expect("Customer token should sign.");
	let key = jsonwebtoken::DecodingKey::from_rsa_pem(PUBLIC_KEY.as_bytes())
		.expect("Fixture public key should parse.");
	let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::RS256);

	validation.set_issuer(&[TokenSigner::ISSUER]);

	let claims = jsonwebtoken::decode::<Claims>(token.expose(), &key, &validation)
		.expect("Token should verify.")
		.claims;

	assert_eq!(claims.roles, vec![Role::Partner, Role::Customer]);
	assert_eq!(claims.intp_id, PARTNER_ID);
	assert_eq!(claims.intpc_id.as_deref(), Some("first_test_01"));
}

#[test]
fn malformed_key_fails_before_any_request() {
	let err = Client::new(ClientConfig::new(PARTNER_ID, "-----BEGIN"))
		.expect_err("Malformed key must fail construction.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidPrivateKey { .. })));
}
