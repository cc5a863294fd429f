//! Error taxonomy for request building and dispatch.
//!
//! Every failure surfaced by [`crate::Dispatcher::execute`] is one of the
//! closed set of [`S3RequestError`] variants, so callers can pattern-match on
//! the cause instead of inspecting message text.
//!
//! # Usage
//!
//! ```
//! use s3request_client::{ErrorKind, RequestSpecBuilder, S3RequestError};
//!
//! let mut builder = RequestSpecBuilder::new();
//! let err: S3RequestError = builder.method("FETCH").unwrap_err().into();
//! assert_eq!(err.kind(), ErrorKind::Validation);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::exchange::ExchangeLog;

/// A request builder setter received an argument it cannot accept.
///
/// Raised before any network activity; the builder is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The HTTP method is not one of the supported verbs.
    #[error("http method must be one of GET, PUT, POST, DELETE, HEAD, OPTIONS, PATCH: {0}")]
    InvalidMethod(String),

    /// The bucket name is empty or contains characters that cannot form a host name.
    #[error("bucket name must be a non-empty host label: {0:?}")]
    InvalidBucket(String),

    /// No bucket was set before building the request.
    #[error("bucket name must be set")]
    MissingBucket,

    /// The object key contains control characters.
    #[error("objectName must not contain control characters: {0:?}")]
    InvalidObjectKey(String),

    /// The header name is not a valid HTTP token.
    #[error("header name must be a valid HTTP header name: {0:?}")]
    InvalidHeaderName(String),

    /// The header value cannot be sent in an HTTP header, or has leading,
    /// trailing, or repeated whitespace that would not survive verification.
    #[error(
        "header value for {name} must be a valid HTTP header value without \
         leading, trailing, or repeated whitespace"
    )]
    InvalidHeaderValue {
        /// The header whose value was rejected.
        name: String,
    },

    /// The content type is not a valid MIME type.
    #[error("contentType must be a valid MIME type: {0:?}")]
    InvalidContentType(String),
}

/// A failure raised by the HTTP transport itself (connection refused, DNS,
/// TLS, ...). Non-2xx responses are never transport errors.
#[derive(Debug, thiserror::Error)]
#[error("{source}")]
pub struct TransportError {
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl TransportError {
    /// Wrap any transport failure.
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err)
    }
}

/// The service answered with a status above 299 and a parsable error body.
///
/// Field names other than `code` and `message` are the XML tag names with
/// their first character lower-cased (`RequestId` becomes `requestId`).
#[derive(Debug, Clone, PartialEq)]
pub struct AwsError {
    /// HTTP status code of the response.
    pub status: u16,
    /// The `<Code>` element, e.g. `NoSuchKey`.
    pub code: String,
    /// The `<Message>` element.
    pub message: String,
    /// Every other child element of `<Error>`.
    pub fields: BTreeMap<String, String>,
    /// The exchange that produced this error.
    pub http_request_log: ExchangeLog,
}

impl AwsError {
    /// An additional field such as `requestId`, `hostId`, or `resource`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl fmt::Display for AwsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AWS Error - {}: {}", self.code, self.message)
    }
}

impl std::error::Error for AwsError {}

/// The service answered with a status above 299 but the body could not be
/// read as an error document.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedErrorBody {
    /// HTTP status code of the response.
    pub status: u16,
    /// Explanation naming the status code.
    pub message: String,
    /// The exchange that produced this error.
    pub http_request_log: ExchangeLog,
}

impl MalformedErrorBody {
    pub(crate) fn new(status: u16, http_request_log: ExchangeLog) -> Self {
        Self {
            status,
            message: format!(
                "AWS returned HTTP code {status}, but error content could not be parsed."
            ),
            http_request_log,
        }
    }
}

impl fmt::Display for MalformedErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for MalformedErrorBody {}

/// Coarse classification of an [`S3RequestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Invalid request input.
    Validation,
    /// The service rejected the request (including unparsable error bodies).
    Aws,
    /// The transport failed to complete the exchange.
    Transport,
}

/// Any failure of building or executing a request.
#[derive(Debug, thiserror::Error)]
pub enum S3RequestError {
    /// Invalid request input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Structured error returned by the service.
    #[error(transparent)]
    Aws(Box<AwsError>),

    /// Error status whose body was not a readable error document.
    #[error(transparent)]
    MalformedErrorBody(Box<MalformedErrorBody>),

    /// The transport failed; propagated as raised.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl S3RequestError {
    /// Coarse classification; unparsable error bodies count as [`ErrorKind::Aws`].
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Aws(_) | Self::MalformedErrorBody(_) => ErrorKind::Aws,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }

    /// HTTP status of the failed response, for service errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Aws(err) => Some(err.status),
            Self::MalformedErrorBody(err) => Some(err.status),
            Self::Validation(_) | Self::Transport(_) => None,
        }
    }

    /// The exchange attached to service errors.
    #[must_use]
    pub fn http_request_log(&self) -> Option<&ExchangeLog> {
        match self {
            Self::Aws(err) => Some(&err.http_request_log),
            Self::MalformedErrorBody(err) => Some(&err.http_request_log),
            Self::Validation(_) | Self::Transport(_) => None,
        }
    }
}

impl From<AwsError> for S3RequestError {
    fn from(err: AwsError) -> Self {
        Self::Aws(Box::new(err))
    }
}

impl From<MalformedErrorBody> for S3RequestError {
    fn from(err: MalformedErrorBody) -> Self {
        Self::MalformedErrorBody(Box::new(err))
    }
}

/// Convenience result type for request operations.
pub type S3RequestResult<T> = Result<T, S3RequestError>;
