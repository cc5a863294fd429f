//! Turns error responses into structured errors.

use std::collections::BTreeMap;

use s3request_xml::parse_error_document;
use tracing::debug;

use crate::error::{AwsError, MalformedErrorBody, S3RequestError};
use crate::exchange::ExchangeLog;

/// Decode the body of a response whose status is above 299.
///
/// Each child of the root element becomes a field named after its tag with
/// the first character lower-cased; a repeated tag keeps its last value.
/// `code` and `message` are lifted out of the field map. A body that is not
/// XML yields [`MalformedErrorBody`].
#[must_use]
pub fn decode_error_response(status: u16, body: &[u8], log: ExchangeLog) -> S3RequestError {
    let document = match parse_error_document(body) {
        Ok(document) => document,
        Err(err) => {
            debug!(status, error = %err, "Error response body is not XML");
            return MalformedErrorBody::new(status, log).into();
        }
    };

    let mut fields: BTreeMap<String, String> = document
        .elements
        .into_iter()
        .map(|element| (lower_first(&element.name), element.text))
        .collect();
    let code = fields.remove("code").unwrap_or_default();
    let message = fields.remove("message").unwrap_or_default();

    AwsError {
        status,
        code,
        message,
        fields,
        http_request_log: log,
    }
    .into()
}

/// Lower-case the first character only: `RequestId` becomes `requestId`.
fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
