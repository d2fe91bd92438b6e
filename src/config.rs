//! Client configuration: partner identity, deployment environment, and transport overrides.

// self
use crate::{_prelude::*, auth::PrivateKeyPem, error::ConfigError};

/// TWIPLA deployment targeted by a client.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Environment {
	/// Development gateway.
	Develop,
	/// Staging gateway.
	Stage,
	/// Production gateway.
	#[default]
	Production,
}
impl Environment {
	/// Maps a label to an environment; anything other than `dev` or `stage` is production.
	pub fn from_label(label: &str) -> Self {
		match label {
			"dev" => Environment::Develop,
			"stage" => Environment::Stage,
			_ => Environment::Production,
		}
	}

	/// Returns the stable label for this environment.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Develop => "dev",
			Environment::Stage => "stage",
			Environment::Production => "production",
		}
	}

	/// Returns the API gateway origin for this environment.
	pub const fn api_base(self) -> &'static str {
		match self {
			Environment::Develop => "https://api-gateway.va-endpoint.com",
			Environment::Stage => "https://stage-api-gateway.va-endpoint.com",
			Environment::Production => "https://api-gateway.visitor-analytics.io",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for Environment {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::from_label(s))
	}
}
impl From<String> for Environment {
	fn from(value: String) -> Self {
		Self::from_label(&value)
	}
}
impl From<Environment> for String {
	fn from(value: Environment) -> Self {
		value.as_str().to_owned()
	}
}

/// Everything needed to construct a [`crate::Client`].
///
/// The partner identifier is issued by TWIPLA in exchange for the public half of
/// `private_key`. Deserializing lets integrators keep this in their own config files.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ClientConfig {
	/// Partner (INTP) identifier; also the JWT `kid`.
	pub intp_id: String,
	/// Plaintext PEM contents of the partner's RSA private key.
	pub private_key: PrivateKeyPem,
	/// Deployment to talk to.
	#[serde(default)]
	pub environment: Environment,
	/// Overrides the environment's gateway origin.
	#[serde(default)]
	pub base_url: Option<Url>,
	/// Caller-provided HTTP client; a default one is built otherwise.
	#[serde(skip)]
	pub http_client: Option<ReqwestClient>,
}
impl ClientConfig {
	/// Creates a production configuration for the given partner and PEM key.
	pub fn new(intp_id: impl Into<String>, private_key: impl Into<PrivateKeyPem>) -> Self {
		Self { intp_id: intp_id.into(), private_key: private_key.into(), ..Default::default() }
	}

	/// Selects the deployment environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Points the client at an explicit origin instead of the environment gateway.
	pub fn base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Reuses an existing reqwest client (connection pool, proxies, TLS roots).
	pub fn http_client(mut self, client: ReqwestClient) -> Self {
		self.http_client = Some(client);

		self
	}

	/// Resolves the effective API base URL.
	pub fn resolved_base_url(&self) -> Result<Url> {
		let url = match &self.base_url {
			Some(url) => url.clone(),
			None => {
				let origin = self.environment.api_base();

				Url::parse(origin).map_err(|_| ConfigError::InvalidBaseUrl { url: origin.into() })?
			},
		};

		if url.cannot_be_a_base() {
			return Err(ConfigError::InvalidBaseUrl { url: url.to_string() }.into());
		}

		Ok(url)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn unknown_labels_fall_back_to_production() {
		assert_eq!(Environment::from_label("dev"), Environment::Develop);
		assert_eq!(Environment::from_label("stage"), Environment::Stage);
		assert_eq!(Environment::from_label("production"), Environment::Production);
		assert_eq!(Environment::from_label("qa"), Environment::Production);
		assert_eq!(Environment::from_label(""), Environment::Production);
		assert_eq!("dev".parse::<Environment>(), Ok(Environment::Develop));
	}

	#[test]
	fn environments_map_to_gateways() {
		let base = ClientConfig::new("intp", "pem")
			.environment(Environment::Stage)
			.resolved_base_url()
			.expect("Stage gateway should parse.");

		assert_eq!(base.as_str(), "https://stage-api-gateway.va-endpoint.com/");

		let base = ClientConfig::new("intp", "pem")
			.resolved_base_url()
			.expect("Production gateway should parse.");

		assert_eq!(base.host_str(), Some("api-gateway.visitor-analytics.io"));
	}

	#[test]
	fn explicit_base_url_wins_and_must_be_hierarchical() {
		let custom = Url::parse("http://127.0.0.1:8080/proxy").expect("Fixture URL should parse.");
		let resolved = ClientConfig::new("intp", "pem")
			.environment(Environment::Develop)
			.base_url(custom.clone())
			.resolved_base_url()
			.expect("Custom base URL should be accepted.");

		assert_eq!(resolved, custom);

		let opaque = Url::parse("mailto:dev@twipla.com").expect("Fixture URL should parse.");
		let err = ClientConfig::new("intp", "pem")
			.base_url(opaque)
			.resolved_base_url()
			.expect_err("Opaque URLs cannot carry API paths.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { .. })));
	}

	#[test]
	fn config_deserializes_with_defaults() {
		let config: ClientConfig = serde_json::from_str(
			"{\"intp_id\":\"intp-1\",\"private_key\":\"pem\",\"environment\":\"stage\"}",
		)
		.expect("Config JSON should deserialize.");

		assert_eq!(config.intp_id, "intp-1");
		assert_eq!(config.environment, Environment::Stage);
		assert!(config.base_url.is_none());
		assert!(format!("{config:?}").contains("<redacted>"));
	}
}
