//! HTTP transport seam.
//!
//! The dispatcher never talks to the network directly; it hands a fully
//! signed [`TransportRequest`] to an [`HttpTransport`]. Transports report
//! every HTTP status as a normal response and only fail when no response
//! was obtained at all.

use std::borrow::Cow;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::CONTENT_TYPE;

use crate::error::TransportError;
use crate::exchange::RequestRecord;
use crate::request::HttpMethod;

/// A signed request ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Headers in send order.
    pub headers: Vec<(String, String)>,
    /// Request body.
    pub body: String,
    /// Content type of `body`, when one applies. Also present in `headers`.
    pub content_type: Option<String>,
}

/// What came back from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in received order.
    pub headers: Vec<(String, String)>,
    /// Raw response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// The body decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Whether the status is in the success range (`<= 299`).
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status <= 299
    }

    /// First header named `name`, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Sends requests over HTTP.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Send `request` to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no HTTP response was received.
    /// Non-2xx statuses are returned as `Ok`.
    async fn fetch(
        &self,
        url: &str,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError>;

    /// Describe what [`HttpTransport::fetch`] would send, without sending it.
    fn raw_request(&self, url: &str, request: &TransportRequest) -> RequestRecord {
        RequestRecord::new(url, request)
    }
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// A transport with a default client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport that sends through `client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn fetch(
        &self,
        url: &str,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(content_type) = &request.content_type {
            let already_set = request
                .headers
                .iter()
                .any(|(name, _)| name.eq_ignore_ascii_case(CONTENT_TYPE.as_str()));
            if !already_set {
                builder = builder.header(CONTENT_TYPE, content_type.as_str());
            }
        }

        let response = builder.body(request.body.clone()).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.bytes().await?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_success_statuses() {
        let mut response = TransportResponse {
            status: 204,
            headers: vec![("ETag".to_owned(), "\"abc\"".to_owned())],
            body: Bytes::from_static(b"ok"),
        };
        assert!(response.is_success());
        assert_eq!(response.text(), "ok");
        assert_eq!(response.header("etag"), Some("\"abc\""));

        response.status = 301;
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_should_report_connection_failure_as_transport_error() {
        let transport = ReqwestTransport::new();
        let request = TransportRequest {
            method: HttpMethod::Get,
            headers: Vec::new(),
            body: String::new(),
            content_type: None,
        };
        // Nothing listens on the discard port.
        let result = transport.fetch("http://127.0.0.1:9/", &request).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_should_describe_request_without_sending() {
        let transport = ReqwestTransport::new();
        let request = TransportRequest {
            method: HttpMethod::Delete,
            headers: vec![("Date".to_owned(), "Tue, 05 Mar 2024 10:00:00 GMT".to_owned())],
            body: String::new(),
            content_type: None,
        };
        let record = transport.raw_request("http://b.s3.us-east-1.amazonaws.com/k", &request);
        assert_eq!(record.method, "DELETE");
        assert_eq!(record.headers.len(), 1);
    }
}
