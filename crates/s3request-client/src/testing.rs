//! In-memory transport for unit tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use s3request_xml::error_to_xml;

use crate::error::TransportError;
use crate::transport::{HttpTransport, TransportRequest, TransportResponse};

/// Records every request and replays queued responses (200 with an empty
/// body once the queue runs dry).
#[derive(Debug, Default)]
pub(crate) struct RecordingTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    unreachable: Vec<String>,
    calls: Mutex<Vec<(String, TransportRequest)>>,
}

impl RecordingTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond_with(self, status: u16, body: &[u8]) -> Self {
        self.responses.lock().push_back(TransportResponse {
            status,
            headers: vec![("x-amz-request-id".to_owned(), "REQ123".to_owned())],
            body: Bytes::copy_from_slice(body),
        });
        self
    }

    /// Answer with an S3 `<Error>` document.
    pub(crate) fn respond_with_error(
        self,
        status: u16,
        code: &str,
        message: &str,
        fields: &[(&str, &str)],
    ) -> Self {
        let body = error_to_xml(code, message, fields);
        self.respond_with(status, &body)
    }

    /// Fail every request sent to `url` with a connection error.
    pub(crate) fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.to_owned());
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, TransportRequest)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl HttpTransport for RecordingTransport {
    async fn fetch(
        &self,
        url: &str,
        request: &TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.lock().push((url.to_owned(), request.clone()));
        if self.unreachable.iter().any(|u| u == url) {
            return Err(TransportError::new(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("connection refused: {url}"),
            )));
        }
        Ok(self
            .responses
            .lock()
            .pop_front()
            .unwrap_or(TransportResponse {
                status: 200,
                headers: Vec::new(),
                body: Bytes::new(),
            }))
    }
}

/// Value of header `name` (ignoring case) in `request`.
pub(crate) fn header<'a>(request: &'a TransportRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .iter()
        .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
