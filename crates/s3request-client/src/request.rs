//! Request description: a validating builder and the frozen spec it produces.
//!
//! A [`RequestSpecBuilder`] checks every argument as it is set and leaves
//! itself untouched when a check fails. [`RequestSpecBuilder::build`] yields a
//! [`RequestSpec`], which has no mutators; the dispatcher works on a copy of
//! its headers, so the same spec can be executed any number of times.
//!
//! # Usage
//!
//! ```
//! use s3request_client::{HttpMethod, RequestSpecBuilder};
//!
//! let spec = RequestSpecBuilder::new()
//!     .http_method(HttpMethod::Put)
//!     .bucket("My-Bucket")?
//!     .object_key("reports/2024.csv")?
//!     .content("a,b,c")
//!     .build()?;
//!
//! assert_eq!(spec.effective_content_type(), "application/x-www-form-urlencoded");
//! # Ok::<(), s3request_client::ValidationError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use http::{HeaderName, HeaderValue};
use s3request_auth::sigv4;
use s3request_auth::{KeyEncoding, SigningRequest};
use s3request_core::AwsRegion;

use crate::error::ValidationError;

/// Content type used for PUT and POST bodies when none is given.
pub const DEFAULT_FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP verbs a request can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    /// `GET`
    #[default]
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `HEAD`
    Head,
    /// `OPTIONS`
    Options,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// The upper-case method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        }
    }

    /// Whether requests with this method get the form content type by default.
    #[must_use]
    pub fn sends_form_by_default(self) -> bool {
        matches!(self, Self::Put | Self::Post)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ValidationError;

    /// Parse an upper-case method name. Matching is case-sensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "POST" => Ok(Self::Post),
            "DELETE" => Ok(Self::Delete),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            "PATCH" => Ok(Self::Patch),
            other => Err(ValidationError::InvalidMethod(other.to_owned())),
        }
    }
}

impl From<HttpMethod> for http::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Post => Self::POST,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Head => Self::HEAD,
            HttpMethod::Options => Self::OPTIONS,
            HttpMethod::Patch => Self::PATCH,
        }
    }
}

/// A request body together with its MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// Body text.
    pub data: String,
    /// MIME type of `data`.
    pub content_type: String,
}

impl Blob {
    /// Create a blob.
    pub fn new(data: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            content_type: content_type.into(),
        }
    }
}

/// Fluent, validating builder for a [`RequestSpec`].
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    method: HttpMethod,
    bucket: Option<String>,
    object_key: String,
    headers: Vec<(String, String)>,
    content: String,
    content_type: Option<String>,
    key_encoding: KeyEncoding,
    timestamp: DateTime<Utc>,
}

impl Default for RequestSpecBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSpecBuilder {
    /// A GET request stamped with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// A GET request stamped with `timestamp`.
    ///
    /// Every date the request carries is derived from this one instant.
    #[must_use]
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            method: HttpMethod::Get,
            bucket: None,
            object_key: String::new(),
            headers: Vec::new(),
            content: String::new(),
            content_type: None,
            key_encoding: KeyEncoding::default(),
            timestamp,
        }
    }

    /// Set the method from its upper-case name.
    pub fn method(&mut self, method: &str) -> Result<&mut Self, ValidationError> {
        self.method = method.parse()?;
        Ok(self)
    }

    /// Set the method.
    pub fn http_method(&mut self, method: HttpMethod) -> &mut Self {
        self.method = method;
        self
    }

    /// Set the target bucket.
    pub fn bucket(&mut self, bucket: &str) -> Result<&mut Self, ValidationError> {
        if bucket.is_empty() || bucket.chars().any(|c| c.is_whitespace() || c == '/') {
            return Err(ValidationError::InvalidBucket(bucket.to_owned()));
        }
        self.bucket = Some(bucket.to_owned());
        Ok(self)
    }

    /// Set the object key. It is used verbatim in the path unless a
    /// different [`KeyEncoding`] is chosen.
    pub fn object_key(&mut self, key: &str) -> Result<&mut Self, ValidationError> {
        if key.chars().any(char::is_control) {
            return Err(ValidationError::InvalidObjectKey(key.to_owned()));
        }
        self.object_key = key.to_owned();
        Ok(self)
    }

    /// Set a header, replacing any earlier header with the same
    /// case-insensitive name.
    pub fn header(&mut self, name: &str, value: &str) -> Result<&mut Self, ValidationError> {
        HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ValidationError::InvalidHeaderName(name.to_owned()))?;
        HeaderValue::from_str(value)
            .ok()
            .filter(|_| is_signable_value(value))
            .ok_or_else(|| ValidationError::InvalidHeaderValue {
                name: name.to_owned(),
            })?;
        upsert_header(&mut self.headers, name, value.to_owned());
        Ok(self)
    }

    /// Set the request body.
    pub fn content(&mut self, content: impl Into<String>) -> &mut Self {
        self.content = content.into();
        self
    }

    /// Set an explicit content type.
    pub fn content_type(&mut self, content_type: &str) -> Result<&mut Self, ValidationError> {
        validate_content_type(content_type)?;
        self.content_type = Some(content_type.to_owned());
        Ok(self)
    }

    /// Set the body and content type from `blob`.
    pub fn blob(&mut self, blob: Blob) -> Result<&mut Self, ValidationError> {
        validate_content_type(&blob.content_type)?;
        self.content = blob.data;
        self.content_type = Some(blob.content_type);
        Ok(self)
    }

    /// Choose how the object key is rendered into the path.
    pub fn key_encoding(&mut self, encoding: KeyEncoding) -> &mut Self {
        self.key_encoding = encoding;
        self
    }

    /// Freeze the builder into a [`RequestSpec`].
    pub fn build(&self) -> Result<RequestSpec, ValidationError> {
        let bucket = self.bucket.clone().ok_or(ValidationError::MissingBucket)?;
        Ok(RequestSpec {
            method: self.method,
            bucket,
            object_key: self.object_key.clone(),
            headers: self.headers.clone(),
            content: self.content.clone(),
            content_type: self.content_type.clone(),
            key_encoding: self.key_encoding,
            timestamp: self.timestamp,
        })
    }
}

/// A complete, immutable request description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    method: HttpMethod,
    bucket: String,
    object_key: String,
    headers: Vec<(String, String)>,
    content: String,
    content_type: Option<String>,
    key_encoding: KeyEncoding,
    timestamp: DateTime<Utc>,
}

impl RequestSpec {
    /// HTTP method.
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Target bucket as given.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object key as given.
    #[must_use]
    pub fn object_key(&self) -> &str {
        &self.object_key
    }

    /// Caller-supplied headers in write order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Request body.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The explicitly set content type, if any.
    #[must_use]
    pub fn explicit_content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// How the object key is rendered into the path.
    #[must_use]
    pub fn key_encoding(&self) -> KeyEncoding {
        self.key_encoding
    }

    /// The instant all request dates are derived from.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// The content type sent with the request; empty means none.
    #[must_use]
    pub fn effective_content_type(&self) -> &str {
        match (&self.content_type, self.method.sends_form_by_default()) {
            (Some(content_type), _) => content_type,
            (None, true) => DEFAULT_FORM_CONTENT_TYPE,
            (None, false) => "",
        }
    }

    /// The signing view of this spec, using its own headers.
    #[must_use]
    pub fn signing_request(&self) -> SigningRequest<'_> {
        self.signing_request_with(&self.headers)
    }

    /// The signing view of this spec with `headers` in place of its own.
    pub(crate) fn signing_request_with<'a>(
        &'a self,
        headers: &'a [(String, String)],
    ) -> SigningRequest<'a> {
        SigningRequest {
            method: self.method.as_str(),
            bucket: &self.bucket,
            object_key: &self.object_key,
            key_encoding: self.key_encoding,
            headers,
            payload: &self.content,
            timestamp: self.timestamp,
        }
    }

    /// Canonical request for this spec as it stands, signed for `region`.
    #[must_use]
    pub fn canonical_request(&self, region: &AwsRegion) -> String {
        sigv4::canonical_request(&self.signing_request(), region)
    }

    /// String to sign for this spec as it stands, signed for `region`.
    #[must_use]
    pub fn string_to_sign(&self, region: &AwsRegion) -> String {
        sigv4::string_to_sign(&self.signing_request(), region)
    }
}

/// Replace any header named `name` (ignoring case) and append the new value.
pub(crate) fn upsert_header(headers: &mut Vec<(String, String)>, name: &str, value: String) {
    headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
    headers.push((name.to_owned(), value));
}

/// Values are signed exactly as written, but servers trim them and fold
/// inner whitespace before verifying, so both must already be absent.
fn is_signable_value(value: &str) -> bool {
    value.trim() == value
        && !value
            .as_bytes()
            .windows(2)
            .any(|pair| pair[0].is_ascii_whitespace() && pair[1].is_ascii_whitespace())
}

fn validate_content_type(content_type: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::InvalidContentType(content_type.to_owned());
    content_type.parse::<mime::Mime>().map_err(|_| invalid())?;
    HeaderValue::from_str(content_type).map_err(|_| invalid())?;
    Ok(())
}
