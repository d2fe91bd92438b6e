//! Resource helpers: thin callers that build a path and a body and hand both to
//! [`Client::send`](crate::Client::send).
//!
//! Each helper performs exactly one pipeline call. None of them retries, merges pages, or
//! checks business rules; whatever the server reports is surfaced unchanged.

pub mod api_keys;
pub mod customers;
pub mod domains;
pub mod packages;
pub mod subscriptions;
pub mod websites;

pub use api_keys::*;
pub use customers::*;
pub use domains::*;
pub use packages::*;
pub use subscriptions::*;
pub use websites::*;

// self
use crate::_prelude::*;

/// Drops sub-second precision so timestamps serialize as `YYYY-MM-DDTHH:MM:SSZ`.
pub(crate) fn billing_timestamp(at: Option<OffsetDateTime>) -> OffsetDateTime {
	let at = at.unwrap_or_else(OffsetDateTime::now_utc).to_offset(time::UtcOffset::UTC);

	at - Duration::nanoseconds(i64::from(at.nanosecond()))
}
