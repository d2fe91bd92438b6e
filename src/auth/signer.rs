//! Short-lived RS256 identity assertions minted per outbound call.
//!
//! [`TokenSigner`] owns the partner identifier and its parsed private key for the lifetime
//! of a [`crate::Client`]. Tokens are never cached: each call to
//! [`TokenSigner::partner_token`] or [`TokenSigner::customer_token`] signs a new assertion
//! valid for [`TokenSigner::VALIDITY`] from the moment it is issued. The JWT header carries
//! `kid = partner id` so the platform can select the matching public key.

// crates.io
use jsonwebtoken::{Algorithm, EncodingKey, Header};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, PrivateKeyPem},
	error::ConfigError,
};

/// Role granted by a signed assertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	/// The integration partner itself.
	Partner,
	/// One of the partner's customers.
	Customer,
}
impl Role {
	/// Returns the wire label used in the `roles` claim.
	pub const fn as_str(self) -> &'static str {
		match self {
			Role::Partner => "partner",
			Role::Customer => "customer",
		}
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Whom a token is scoped to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenScope {
	/// Partner-only assertion.
	Partner,
	/// Assertion on behalf of the given customer identifier, embedded verbatim.
	Customer(String),
}
impl TokenScope {
	/// Roles asserted for this scope.
	pub fn roles(&self) -> Vec<Role> {
		match self {
			TokenScope::Partner => vec![Role::Partner],
			TokenScope::Customer(_) => vec![Role::Partner, Role::Customer],
		}
	}

	fn customer_id(&self) -> Option<String> {
		match self {
			TokenScope::Partner => None,
			TokenScope::Customer(id) => Some(id.clone()),
		}
	}
}

/// Registered and private claims carried by every token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
	/// Issuer, always [`TokenSigner::ISSUER`].
	pub iss: String,
	/// Asserted roles.
	pub roles: Vec<Role>,
	/// Partner identifier.
	pub intp_id: String,
	/// Customer identifier for customer-scoped tokens.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub intpc_id: Option<String>,
	/// Issued-at, seconds since the Unix epoch.
	pub iat: i64,
	/// Expiry, seconds since the Unix epoch.
	pub exp: i64,
}

/// Signs identity assertions with the partner's private key.
#[derive(Clone)]
pub struct TokenSigner {
	partner_id: String,
	key: EncodingKey,
}
impl TokenSigner {
	/// Issuer claim stamped on every token.
	pub const ISSUER: &'static str = "twipla-3as-go-sdk";
	/// Lifetime of every token.
	pub const VALIDITY: Duration = Duration::hours(4);

	/// Parses the PEM key and proves it can sign before returning.
	///
	/// Fails with [`ConfigError::NoPrivateKey`] when `pem` is empty and with
	/// [`ConfigError::InvalidPrivateKey`] when the material cannot produce an RS256 signature.
	pub fn new(partner_id: impl Into<String>, pem: &PrivateKeyPem) -> Result<Self, ConfigError> {
		if pem.is_empty() {
			return Err(ConfigError::NoPrivateKey);
		}

		let key = EncodingKey::from_rsa_pem(pem.expose())
			.map_err(|source| ConfigError::InvalidPrivateKey { source })?;
		let signer = Self { partner_id: partner_id.into(), key };

		// Parsing only checks the PEM envelope; a probe signature validates the key itself.
		signer
			.encode(&TokenScope::Partner, OffsetDateTime::now_utc())
			.map_err(|source| ConfigError::InvalidPrivateKey { source })?;

		Ok(signer)
	}

	/// Partner identifier used for `intp_id` and `kid`.
	pub fn partner_id(&self) -> &str {
		&self.partner_id
	}

	/// Mints a partner-scoped token.
	pub fn partner_token(&self) -> Result<AccessToken> {
		self.sign(&TokenScope::Partner, OffsetDateTime::now_utc())
	}

	/// Mints a token on behalf of `customer_id`.
	///
	/// The identifier is not validated; an empty string yields a token the server rejects.
	pub fn customer_token(&self, customer_id: impl Into<String>) -> Result<AccessToken> {
		self.sign(&TokenScope::Customer(customer_id.into()), OffsetDateTime::now_utc())
	}

	/// Mints a token for `scope` as if issued at `issued_at`.
	pub fn sign(&self, scope: &TokenScope, issued_at: OffsetDateTime) -> Result<AccessToken> {
		self.encode(scope, issued_at)
			.map(AccessToken::new)
			.map_err(|source| Error::Signing { source })
	}

	/// Builds the claim set for `scope` issued at `issued_at`.
	pub fn claims(&self, scope: &TokenScope, issued_at: OffsetDateTime) -> Claims {
		let iat = issued_at.unix_timestamp();

		Claims {
			iss: Self::ISSUER.into(),
			roles: scope.roles(),
			intp_id: self.partner_id.clone(),
			intpc_id: scope.customer_id(),
			iat,
			exp: iat + Self::VALIDITY.whole_seconds(),
		}
	}

	fn encode(
		&self,
		scope: &TokenScope,
		issued_at: OffsetDateTime,
	) -> Result<String, jsonwebtoken::errors::Error> {
		let mut header = Header::new(Algorithm::RS256);

		header.kid = Some(self.partner_id.clone());

		jsonwebtoken::encode(&header, &self.claims(scope, issued_at), &self.key)
	}
}
impl Debug for TokenSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenSigner")
			.field("partner_id", &self.partner_id)
			.field("key", &"<redacted>")
			.finish()
	}
}
