//! Response envelope decoding and pagination primitives.
//!
//! Every successful JSON response wraps its operation-specific payload as
//! `{"payload": ..., "meta": {"page", "pageSize", "pageTotal", "total"}}`. The metadata is
//! present even for non-listing operations, zero-valued there. [`decode_envelope`] is the
//! single generic decode step; the payload type is chosen by the call site.

// crates.io
use serde::Deserializer;
// self
use crate::{
	_prelude::*,
	error::ProtocolError,
	http::{QueryParams, RawResponse},
};

/// Page size sent when a [`Pagination`] leaves it unset.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Pagination metadata returned alongside every payload.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationMetadata {
	/// Current page (zero-based).
	pub page: u64,
	/// Current page size.
	pub page_size: u64,
	/// Number of pages available for the current page size.
	pub page_total: u64,
	/// Number of results available.
	pub total: u64,
}

/// Typed success envelope.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct Envelope<T> {
	/// Operation-specific payload.
	#[serde(default, deserialize_with = "null_as_default")]
	pub payload: T,
	/// Pagination metadata (zero-valued for non-listing operations).
	#[serde(rename = "meta", default, deserialize_with = "null_as_default")]
	pub meta: PaginationMetadata,
}

/// Request-side page selection, translated into `page` and `pageSize` query parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
	/// Zero-based page index.
	pub page: u32,
	/// Page size; zero means [`DEFAULT_PAGE_SIZE`].
	pub page_size: u32,
}
impl Pagination {
	/// Selects `page` with the given `page_size`.
	pub fn new(page: u32, page_size: u32) -> Self {
		Self { page, page_size }
	}

	/// Effective page size after applying the default.
	pub fn effective_page_size(&self) -> u32 {
		if self.page_size == 0 { DEFAULT_PAGE_SIZE } else { self.page_size }
	}

	/// Encodes the selection as query parameters.
	pub fn to_query(&self) -> QueryParams {
		QueryParams::new()
			.with("page", self.page.to_string())
			.with("pageSize", self.effective_page_size().to_string())
	}
}

/// Decodes a successful response into a typed envelope.
///
/// `204 No Content` yields a zero-valued envelope. Any other response must declare
/// `application/json`; otherwise the error embeds the content type and raw body.
pub fn decode_envelope<T>(response: RawResponse) -> Result<Envelope<T>>
where
	T: DeserializeOwned + Default,
{
	if response.status == 204 {
		return Ok(Envelope::default());
	}

	let declared = response.content_type.as_deref().unwrap_or_default();

	if media_type(declared) != "application/json" {
		return Err(ProtocolError::UnexpectedContentType {
			content_type: declared.to_owned(),
			body: response.body_text(),
		}
		.into());
	}

	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de).map_err(|source| {
		let body = response.body_snippet();

		ProtocolError::MalformedJson { status: response.status, body, source }.into()
	})
}

/// Returns the lowercase media type of a `Content-Type` value without its parameters.
pub(crate) fn media_type(content_type: &str) -> String {
	content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase()
}

/// Deserializes `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
	struct Item {
		id: String,
	}

	fn json(status: u16, body: &str) -> RawResponse {
		RawResponse::new(status, Some("application/json; charset=utf-8"), body)
	}

	#[test]
	fn no_content_yields_zero_values() {
		let envelope = decode_envelope::<Vec<Item>>(RawResponse::new(204, None, ""))
			.expect("No content must not be an error.");

		assert!(envelope.payload.is_empty());
		assert_eq!(envelope.meta, PaginationMetadata::default());

		let envelope = decode_envelope::<Item>(RawResponse::new(204, Some("text/plain"), "x"))
			.expect("No content ignores the declared content type.");

		assert_eq!(envelope.payload, Item::default());
	}

	#[test]
	fn decodes_payload_and_meta() {
		let envelope = decode_envelope::<Vec<Item>>(json(
			200,
			"{\"payload\":[{\"id\":\"a\"},{\"id\":\"b\"}],\"meta\":{\"page\":1,\"pageSize\":2,\"pageTotal\":3,\"total\":6}}",
		))
		.expect("Envelope should decode.");

		assert_eq!(envelope.payload.len(), 2);
		assert_eq!(envelope.payload[1].id, "b");
		assert_eq!(
			envelope.meta,
			PaginationMetadata { page: 1, page_size: 2, page_total: 3, total: 6 }
		);
	}

	#[test]
	fn null_payload_and_meta_fall_back_to_defaults() {
		let envelope = decode_envelope::<Vec<Item>>(json(200, "{\"payload\":null,\"meta\":null}"))
			.expect("Null members should decode as zero values.");

		assert!(envelope.payload.is_empty());
		assert_eq!(envelope.meta, PaginationMetadata::default());
	}

	#[test]
	fn non_json_success_embeds_content_type_and_body() {
		let err = decode_envelope::<Item>(RawResponse::new(
			200,
			Some("text/html"),
			"<html>gateway</html>",
		))
		.expect_err("HTML must not decode as an envelope.");
		let rendered = err.to_string();

		assert!(rendered.contains("text/html"), "{rendered}");
		assert!(rendered.contains("<html>gateway</html>"), "{rendered}");

		let err = decode_envelope::<Item>(RawResponse::new(200, None, "plain"))
			.expect_err("Missing content type must be rejected.");

		assert!(matches!(err, Error::Protocol(ProtocolError::UnexpectedContentType { .. })));
	}

	#[test]
	fn structural_mismatch_reports_json_path() {
		let err = decode_envelope::<Item>(json(200, "{\"payload\":{\"id\":7},\"meta\":{}}"))
			.expect_err("Numeric id must not decode into a string.");
		let rendered = err.to_string();

		assert!(rendered.contains("at `payload.id`"), "{rendered}");
		assert!(rendered.contains("{\"payload\":{\"id\":7}"), "{rendered}");

		match err {
			Error::Protocol(ProtocolError::MalformedJson { status, body, source }) => {
				assert_eq!(status, 200);
				assert_eq!(source.path().to_string(), "payload.id");
				assert_eq!(body, "{\"payload\":{\"id\":7},\"meta\":{}}");
			},
			other => panic!("Unexpected error variant: {other:?}."),
		}
	}

	#[test]
	fn zero_page_size_defaults_to_ten() {
		let query = Pagination::default().to_query();

		assert_eq!(query.encode(), "page=0&pageSize=10");
		assert_eq!(Pagination::new(3, 25).to_query().encode(), "page=3&pageSize=25");
	}

	#[test]
	fn media_type_ignores_parameters_and_case() {
		assert_eq!(media_type("Application/JSON ; charset=utf-8"), "application/json");
		assert_eq!(media_type(""), "");
	}
}
