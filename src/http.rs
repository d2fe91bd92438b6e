//! Authenticated request pipeline.
//!
//! [`Client::call`] is the only path by which resource helpers reach the network. Each call
//! joins the relative path onto the configured base URL, encodes the [`RequestBody`], mints a
//! fresh partner-scoped bearer token, executes the request once, and classifies any
//! `>= 400` response:
//!
//! - a non-JSON error body fails with [`ProtocolError::NonJsonErrorResponse`] carrying the raw
//!   text;
//! - a JSON error body whose `error` field is exactly `"invalid access token"` fails with
//!   [`Error::InvalidAccessToken`], whatever the status code;
//! - any other JSON error body fails with [`Error::Api`].
//!
//! Successful responses are handed to [`crate::envelope::decode_envelope`] by [`Client::send`].
//! Nothing is retried, cached, or logged; the optional `tracing` and `metrics` features only
//! add spans and counters around each call.

// std
use std::time::{Duration as StdDuration, Instant};
// crates.io
use reqwest::{
	Request, Response,
	header::{AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, TokenSigner},
	config::{ClientConfig, Environment},
	envelope::{self, Envelope},
	error::{ApiError, ConfigError, ProtocolError, TransportError},
	obs::{self, CallOutcome, CallSpan},
};

/// Ordered query-parameter set; one value per key, encoded in key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(BTreeMap<String, String>);
impl QueryParams {
	/// Creates an empty set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets `key`, replacing any previous value, and returns the set.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(key, value);

		self
	}

	/// Sets `key`, replacing any previous value.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Returns the value stored under `key`.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Returns `true` when no parameter is set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Encodes the set as `application/x-www-form-urlencoded`.
	pub fn encode(&self) -> String {
		url::form_urlencoded::Serializer::new(String::new()).extend_pairs(self.0.iter()).finish()
	}
}

/// What a call sends besides its method and path.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum RequestBody {
	/// No body and no query string.
	#[default]
	Empty,
	/// Parameters encoded onto the URL; no body is sent.
	Query(QueryParams),
	/// Value sent as the JSON request body.
	Json(serde_json::Value),
}
impl RequestBody {
	/// Serializes `value` into a JSON body.
	pub fn json<T>(value: &T) -> Result<Self>
	where
		T: ?Sized + Serialize,
	{
		serde_json::to_value(value)
			.map(Self::Json)
			.map_err(|source| ProtocolError::EncodeBody { source }.into())
	}
}
impl From<QueryParams> for RequestBody {
	fn from(value: QueryParams) -> Self {
		Self::Query(value)
	}
}

/// Caller-supplied deadline for a single call.
///
/// Dropping the call's future cancels it at any point. A deadline that has already elapsed
/// fails the call with [`TransportError::Cancelled`] before anything is sent; one reached while
/// the request is in flight fails with [`TransportError::Timeout`]. The default context has no
/// deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
	deadline: Option<Instant>,
}
impl RequestContext {
	/// Context without a deadline.
	pub fn background() -> Self {
		Self::default()
	}

	/// Context expiring `timeout` from now.
	pub fn with_timeout(timeout: StdDuration) -> Self {
		Self { deadline: Instant::now().checked_add(timeout) }
	}

	/// Context expiring at `deadline`.
	pub fn with_deadline(deadline: Instant) -> Self {
		Self { deadline: Some(deadline) }
	}

	/// Returns the deadline, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.deadline
	}

	fn remaining(&self) -> Result<Option<StdDuration>, TransportError> {
		let Some(deadline) = self.deadline else {
			return Ok(None);
		};
		let now = Instant::now();

		if deadline <= now {
			return Err(TransportError::Cancelled);
		}

		Ok(Some(deadline - now))
	}
}

/// Status, content type, and body of a response, read in full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawResponse {
	/// HTTP status code.
	pub status: u16,
	/// `Content-Type` header, when present and valid UTF-8.
	pub content_type: Option<String>,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Longest body prefix embedded in decode errors.
	pub const SNIPPET_CHARS: usize = 256;

	/// Builds a response from its parts.
	pub fn new(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> Self {
		Self { status, content_type: content_type.map(str::to_owned), body: body.into() }
	}

	/// Returns the body as text, replacing invalid UTF-8.
	pub fn body_text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}

	/// Returns at most [`Self::SNIPPET_CHARS`] characters of the body as text.
	pub fn body_snippet(&self) -> String {
		let text = String::from_utf8_lossy(&self.body);

		match text.char_indices().nth(Self::SNIPPET_CHARS) {
			Some((end, _)) => format!("{}...", &text[..end]),
			None => text.into_owned(),
		}
	}

	async fn read(response: Response) -> Result<Self> {
		let status = response.status().as_u16();
		let content_type = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|value| value.to_str().ok())
			.map(str::to_owned);
		let body = response.bytes().await.map_err(TransportError::from)?.to_vec();

		Ok(Self { status, content_type, body })
	}
}

/// Client for the 3AS partner API.
///
/// Cheap to clone; clones share the signer, HTTP connection pool, and base URL. All state is
/// read-only after construction, so one instance can serve concurrent calls from many tasks.
#[derive(Clone)]
pub struct Client {
	inner: Arc<ClientInner>,
}
struct ClientInner {
	signer: TokenSigner,
	http: ReqwestClient,
	base_url: Url,
	environment: Environment,
}
impl Client {
	/// Validates the configuration and builds a client.
	///
	/// Fails with [`ConfigError::NoPrivateKey`] when the key is missing and
	/// [`ConfigError::InvalidPrivateKey`] when it cannot sign; no network activity happens here.
	pub fn new(config: ClientConfig) -> Result<Self> {
		let signer = TokenSigner::new(config.intp_id.clone(), &config.private_key)?;
		let base_url = config.resolved_base_url()?;
		let http = match config.http_client {
			Some(client) => client,
			None => ReqwestClient::builder().build().map_err(ConfigError::http_client_build)?,
		};

		Ok(Self {
			inner: Arc::new(ClientInner {
				signer,
				http,
				base_url,
				environment: config.environment,
			}),
		})
	}

	/// Environment the client was configured for.
	pub fn environment(&self) -> Environment {
		self.inner.environment
	}

	/// Base URL every path is joined onto.
	pub fn base_url(&self) -> &Url {
		&self.inner.base_url
	}

	/// Signer holding the partner identity.
	pub fn signer(&self) -> &TokenSigner {
		&self.inner.signer
	}

	/// Joins a relative API path onto the base URL.
	pub fn endpoint(&self, path: &str) -> Result<Url> {
		let mut url = self.inner.base_url.clone();

		url.set_query(None);
		url.path_segments_mut()
			.map_err(|_| ConfigError::InvalidBaseUrl { url: self.inner.base_url.to_string() })?
			.pop_if_empty()
			.extend(path.split('/').filter(|segment| !segment.is_empty()));

		Ok(url)
	}

	/// Builds the outbound request for a call without sending it.
	pub fn build_request(
		&self,
		ctx: &RequestContext,
		method: Method,
		path: &str,
		body: RequestBody,
	) -> Result<Request> {
		let remaining = ctx.remaining()?;
		let mut url = self.endpoint(path)?;
		let payload = match body {
			RequestBody::Empty => None,
			RequestBody::Query(query) => {
				if !query.is_empty() {
					url.set_query(Some(&query.encode()));
				}

				None
			},
			RequestBody::Json(value) => Some(
				serde_json::to_vec(&value).map_err(|source| ProtocolError::EncodeBody { source })?,
			),
		};
		let token = self.inner.signer.partner_token()?;
		let sends_json = !matches!(method, Method::GET | Method::DELETE);
		let mut builder =
			self.inner.http.request(method, url).header(AUTHORIZATION, token.bearer());

		if sends_json {
			builder = builder.header(CONTENT_TYPE, "application/json");
		}
		if let Some(payload) = payload {
			builder = builder.body(payload);
		}
		if let Some(remaining) = remaining {
			builder = builder.timeout(remaining);
		}

		builder.build().map_err(|source| ConfigError::RequestBuild { source }.into())
	}

	/// Executes one authenticated call and returns the raw successful response.
	pub async fn call(
		&self,
		ctx: &RequestContext,
		method: Method,
		path: &str,
		body: RequestBody,
	) -> Result<RawResponse> {
		let span = CallSpan::new(&method, path);

		obs::record_call_outcome(&method, CallOutcome::Attempt);

		let result = span
			.instrument(async {
				let request = self.build_request(ctx, method.clone(), path, body)?;
				let response =
					self.inner.http.execute(request).await.map_err(TransportError::from)?;
				let raw = RawResponse::read(response).await?;

				if raw.status >= 400 {
					return Err(classify_error_response(raw));
				}

				Ok(raw)
			})
			.await;

		match &result {
			Ok(_) => obs::record_call_outcome(&method, CallOutcome::Success),
			Err(_) => obs::record_call_outcome(&method, CallOutcome::Failure),
		}

		result
	}

	/// Executes one authenticated call and decodes its envelope into `T`.
	pub async fn send<T>(
		&self,
		ctx: &RequestContext,
		method: Method,
		path: &str,
		body: RequestBody,
	) -> Result<Envelope<T>>
	where
		T: DeserializeOwned + Default,
	{
		envelope::decode_envelope(self.call(ctx, method, path, body).await?)
	}

	/// Mints a partner-scoped access token.
	pub fn partner_access_token(&self) -> Result<AccessToken> {
		self.inner.signer.partner_token()
	}

	/// Mints an access token on behalf of one of the partner's customers.
	pub fn customer_access_token(&self, customer_id: impl Into<String>) -> Result<AccessToken> {
		self.inner.signer.customer_token(customer_id)
	}
}
impl Debug for Client {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("environment", &self.inner.environment)
			.field("base_url", &self.inner.base_url.as_str())
			.field("signer", &self.inner.signer)
			.finish()
	}
}

/// Classifies a `>= 400` response into the client error taxonomy.
pub fn classify_error_response(response: RawResponse) -> Error {
	let declared = response.content_type.as_deref().unwrap_or_default();

	// Only a loose `json` substring is required here, unlike the success path.
	if !declared.to_ascii_lowercase().contains("json") {
		return ProtocolError::NonJsonErrorResponse {
			status: response.status,
			body: response.body_text(),
		}
		.into();
	}

	let mut de = serde_json::Deserializer::from_slice(&response.body);
	let mut api_error: ApiError = match serde_path_to_error::deserialize(&mut de) {
		Ok(api_error) => api_error,
		Err(source) => {
			let body = response.body_snippet();

			return ProtocolError::MalformedJson { status: response.status, body, source }.into();
		},
	};

	if api_error.is_invalid_access_token() {
		return Error::InvalidAccessToken;
	}
	if api_error.status == 0 {
		api_error.status = response.status;
	}

	api_error.into()
}
