//! Per-call record of a request/response exchange.
//!
//! Every execution produces its own [`ExchangeLog`], returned with the
//! response or attached to the error, so nothing is shared between calls.
//! Credentials never appear in it: the `Authorization` header is recorded
//! with its credential and signature blanked out.

use std::fmt;

use s3request_auth::sigv4::parse_authorization_header;
use serde::Serialize;

use crate::transport::{TransportRequest, TransportResponse};

/// Longest response body prefix kept in a log, in bytes.
const MAX_LOGGED_BODY: usize = 4096;

const REDACTED: &str = "<redacted>";

/// The request half of an exchange, as handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestRecord {
    /// HTTP method.
    pub method: String,
    /// Target URL.
    pub url: String,
    /// Headers in send order, with `Authorization` redacted.
    pub headers: Vec<(String, String)>,
    /// Size of the request body in bytes.
    pub body_len: usize,
}

impl RequestRecord {
    /// Describe `request` as sent to `url`.
    #[must_use]
    pub fn new(url: &str, request: &TransportRequest) -> Self {
        let headers = request
            .headers
            .iter()
            .map(|(name, value)| {
                if name.eq_ignore_ascii_case("authorization") {
                    (name.clone(), redact_authorization(value))
                } else {
                    (name.clone(), value.clone())
                }
            })
            .collect();
        Self {
            method: request.method.as_str().to_owned(),
            url: url.to_owned(),
            headers,
            body_len: request.body.len(),
        }
    }
}

/// The response half of an exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Response body as text, cut at 4 KiB.
    pub body: String,
    /// Whether `body` was cut.
    pub truncated: bool,
}

impl ResponseRecord {
    /// Describe `response`.
    #[must_use]
    pub fn new(response: &TransportResponse) -> Self {
        let truncated = response.body.len() > MAX_LOGGED_BODY;
        let shown = if truncated {
            &response.body[..MAX_LOGGED_BODY]
        } else {
            &response.body[..]
        };
        Self {
            status: response.status,
            headers: response.headers.clone(),
            body: String::from_utf8_lossy(shown).into_owned(),
            truncated,
        }
    }
}

/// The request/response pair recorded for one execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeLog {
    /// What was sent.
    pub request: RequestRecord,
    /// What came back.
    pub response: ResponseRecord,
}

impl ExchangeLog {
    /// Pair a request description with the response it produced.
    #[must_use]
    pub fn new(request: RequestRecord, response: &TransportResponse) -> Self {
        Self {
            request,
            response: ResponseRecord::new(response),
        }
    }
}

impl fmt::Display for ExchangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.request.method, self.request.url)?;
        for (name, value) in &self.request.headers {
            writeln!(f, "{name}: {value}")?;
        }
        writeln!(f, "({} byte body)", self.request.body_len)?;
        writeln!(f)?;
        writeln!(f, "HTTP {}", self.response.status)?;
        for (name, value) in &self.response.headers {
            writeln!(f, "{name}: {value}")?;
        }
        write!(f, "{}", self.response.body)?;
        if self.response.truncated {
            write!(f, "...")?;
        }
        Ok(())
    }
}

/// A successful execution: the untouched response and its exchange log.
#[derive(Debug, Clone)]
pub struct Exchange {
    /// The response as returned by the transport.
    pub response: TransportResponse,
    /// The recorded exchange.
    pub log: ExchangeLog,
}

/// Keep only the algorithm and `SignedHeaders` of an `Authorization` value.
fn redact_authorization(value: &str) -> String {
    match parse_authorization_header(value) {
        Ok(parsed) => format!(
            "{} Credential={REDACTED},SignedHeaders={},Signature={REDACTED}",
            parsed.algorithm,
            parsed.signed_headers.join(";")
        ),
        Err(_) => REDACTED.to_owned(),
    }
}
