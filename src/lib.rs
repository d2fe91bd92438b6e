//! Async client for the TWIPLA 3AS partner API.
//!
//! Every call is authenticated with a freshly minted, four-hour RS256 bearer token signed by
//! the integration partner's own private key. Responses are decoded through a single generic
//! envelope step, and failures are classified into configuration, transport, protocol,
//! authentication, and business errors so callers can decide what to do with each.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod obs;
pub mod resources;

pub use auth::{AccessToken, Claims, Role, TokenScope, TokenSigner};
pub use config::{ClientConfig, Environment};
pub use envelope::{Envelope, Pagination, PaginationMetadata};
pub use error::{ApiError, Error, Result};
pub use http::{Client, QueryParams, RequestBody, RequestContext};
pub use resources::{
	ApiKey, CreateApiKeyArgs, CreateCustomerArgs, CreatePackageArgs, CreateWebsiteArgs, Currency,
	Customer, Package, Period, SubscriptionAction, SubscriptionState, SubscriptionTarget,
	SubscriptionType, UpdatePackageArgs, UpgradeArgs, Website,
};

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, Method};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
