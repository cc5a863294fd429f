//! AWS Signature Version 4 signing.
//!
//! This module implements the signing flow for a single request:
//!
//! 1. Build the canonical request from the method, path, headers, and payload.
//! 2. Build the string to sign from the request date, credential scope, and
//!    canonical request hash.
//! 3. Derive the signing key using HMAC-SHA256 from the secret key and the
//!    credential scope components.
//! 4. Compute the signature and assemble the `Authorization` header.
//!
//! The date line of the string to sign is the RFC 1123 rendering of the
//! request timestamp, i.e. the same value that is sent in the `Date` header.
//!
//! The main entry point is [`RequestSigner::sign`].

use chrono::{DateTime, Utc};
use s3request_core::{AwsRegion, SigningCredentials};
use tracing::debug;

use crate::canonical::{CanonicalHeaders, KeyEncoding, build_canonical_request, build_canonical_uri};
use crate::crypto::{DigestAlgorithm, MacAlgorithm};
use crate::error::AuthError;

/// The only algorithm supported by this implementation.
pub const SIGNING_ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Service name used in the credential scope.
pub const S3_SERVICE: &str = "s3";

const SCOPE_TERMINATOR: &str = "aws4_request";

/// Everything about a request that takes part in its signature.
#[derive(Debug, Clone, Copy)]
pub struct SigningRequest<'a> {
    /// HTTP method name (`GET`, `PUT`, ...).
    pub method: &'a str,
    /// Target bucket; lower-cased into the host name.
    pub bucket: &'a str,
    /// Object key, rendered into the path according to `key_encoding`.
    pub object_key: &'a str,
    /// How the object key is rendered into the path.
    pub key_encoding: KeyEncoding,
    /// Request headers in write order.
    pub headers: &'a [(String, String)],
    /// Request body.
    pub payload: &'a str,
    /// The single timestamp every date-derived value comes from.
    pub timestamp: DateTime<Utc>,
}

impl SigningRequest<'_> {
    /// Host name for this request in `region`.
    #[must_use]
    pub fn host(&self, region: &AwsRegion) -> String {
        region.s3_host(self.bucket)
    }

    /// Request path (`/` + encoded object key).
    #[must_use]
    pub fn path(&self) -> String {
        build_canonical_uri(self.object_key, self.key_encoding)
    }

    /// The folded header set, including the injected `host`.
    #[must_use]
    pub fn canonical_headers(&self, region: &AwsRegion) -> CanonicalHeaders {
        CanonicalHeaders::new(
            self.headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
            &self.host(region),
        )
    }
}

/// Output of signing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// The canonical request that was hashed.
    pub canonical_request: String,
    /// The string that was HMAC-signed.
    pub string_to_sign: String,
    /// The `SignedHeaders` value.
    pub signed_headers: String,
    /// Hex-encoded signature.
    pub signature: String,
    /// Full `Authorization` header value.
    pub authorization: String,
    /// RFC 1123 request date, the value of the `Date` header.
    pub date: String,
    /// Host name the request is addressed to.
    pub host: String,
    /// Request path (`/` + object key).
    pub path: String,
}

/// Build the canonical request for `request` in `region`.
#[must_use]
pub fn canonical_request(request: &SigningRequest<'_>, region: &AwsRegion) -> String {
    build_canonical_request(
        request.method,
        &request.path(),
        &request.canonical_headers(region),
        &hash_payload(request.payload.as_bytes()),
    )
}

/// Build the string to sign for `request` in `region`.
#[must_use]
pub fn string_to_sign(request: &SigningRequest<'_>, region: &AwsRegion) -> String {
    let canonical = canonical_request(request, region);
    string_to_sign_for(request.timestamp, region, &canonical)
}

fn string_to_sign_for(timestamp: DateTime<Utc>, region: &AwsRegion, canonical: &str) -> String {
    let scope = credential_scope(&format_date_stamp(timestamp), region.as_str());
    build_string_to_sign(
        &format_http_date(timestamp),
        &scope,
        &hash_payload(canonical.as_bytes()),
    )
}

/// Signs requests with one set of credentials.
#[derive(Debug, Clone, Copy)]
pub struct RequestSigner<'a> {
    credentials: &'a SigningCredentials,
}

impl<'a> RequestSigner<'a> {
    /// Create a signer for `credentials`.
    #[must_use]
    pub fn new(credentials: &'a SigningCredentials) -> Self {
        Self { credentials }
    }

    /// Sign `request`.
    ///
    /// The signed header set is computed once and shared by the canonical
    /// request and the `Authorization` header.
    #[must_use]
    pub fn sign(&self, request: &SigningRequest<'_>) -> SignedRequest {
        let region = self.credentials.region();
        let host = request.host(region);
        let path = request.path();
        let headers = request.canonical_headers(region);
        let payload_hash = hash_payload(request.payload.as_bytes());

        let canonical_request =
            build_canonical_request(request.method, &path, &headers, &payload_hash);
        debug!(canonical_request, "Built canonical request");

        let string_to_sign = string_to_sign_for(request.timestamp, region, &canonical_request);
        debug!(string_to_sign, "Built string to sign");

        let date_stamp = format_date_stamp(request.timestamp);
        let signing_key = derive_signing_key(
            self.credentials.secret_access_key(),
            &date_stamp,
            region.as_str(),
            S3_SERVICE,
        );
        let signature = compute_signature(&signing_key, &string_to_sign);

        let signed_headers = headers.signed_headers();
        let authorization = build_authorization_header(
            self.credentials.access_key_id(),
            &credential_scope(&date_stamp, region.as_str()),
            &signed_headers,
            &signature,
        );

        SignedRequest {
            canonical_request,
            string_to_sign,
            signed_headers,
            signature,
            authorization,
            date: format_http_date(request.timestamp),
            host,
            path,
        }
    }
}

/// Format a timestamp as the 8-digit `YYYYMMDD` credential scope date.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use s3request_auth::sigv4::format_date_stamp;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
/// assert_eq!(format_date_stamp(ts), "20240305");
/// ```
#[must_use]
pub fn format_date_stamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y%m%d").to_string()
}

/// Format a timestamp as an RFC 1123 HTTP date (`Tue, 05 Mar 2024 10:00:00 GMT`).
#[must_use]
pub fn format_http_date(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Build the credential scope `date/region/s3/aws4_request`.
#[must_use]
pub fn credential_scope(date_stamp: &str, region: &str) -> String {
    format!("{date_stamp}/{region}/{S3_SERVICE}/{SCOPE_TERMINATOR}")
}

/// Build the SigV4 string to sign.
///
/// Format:
/// ```text
/// AWS4-HMAC-SHA256\n
/// <request date>\n
/// <credential_scope>\n
/// <hex(SHA256(canonical_request))>
/// ```
///
/// # Examples
///
/// ```
/// use s3request_auth::sigv4::build_string_to_sign;
///
/// let sts = build_string_to_sign(
///     "Fri, 24 May 2013 00:00:00 GMT",
///     "20130524/us-east-1/s3/aws4_request",
///     "7344ae5b7ee6c3e7e6b0fe0640412a37625d1fbfff95c48bbb2dc43964946972",
/// );
/// assert!(sts.starts_with("AWS4-HMAC-SHA256\nFri, 24 May 2013 00:00:00 GMT\n"));
/// ```
#[must_use]
pub fn build_string_to_sign(
    timestamp: &str,
    credential_scope: &str,
    canonical_request_hash: &str,
) -> String {
    format!("{SIGNING_ALGORITHM}\n{timestamp}\n{credential_scope}\n{canonical_request_hash}")
}

/// Derive the SigV4 signing key using HMAC-SHA256 chain.
///
/// ```text
/// DateKey              = HMAC-SHA256("AWS4" + secret_key, date)
/// DateRegionKey        = HMAC-SHA256(DateKey, region)
/// DateRegionServiceKey = HMAC-SHA256(DateRegionKey, service)
/// SigningKey           = HMAC-SHA256(DateRegionServiceKey, "aws4_request")
/// ```
#[must_use]
pub fn derive_signing_key(secret_key: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let hmac = MacAlgorithm::HmacSha256;
    let date_key = hmac.sign(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let date_region_key = hmac.sign(&date_key, region.as_bytes());
    let date_region_service_key = hmac.sign(&date_region_key, service.as_bytes());
    hmac.sign(&date_region_service_key, SCOPE_TERMINATOR.as_bytes())
}

/// Compute the HMAC-SHA256 signature of `data` using the given `signing_key`.
///
/// Returns the hex-encoded signature.
#[must_use]
pub fn compute_signature(signing_key: &[u8], data: &str) -> String {
    hex::encode(MacAlgorithm::HmacSha256.sign(signing_key, data.as_bytes()))
}

/// Assemble the `Authorization` header value.
///
/// # Examples
///
/// ```
/// use s3request_auth::sigv4::build_authorization_header;
///
/// let header = build_authorization_header(
///     "AKID",
///     "20130524/us-east-1/s3/aws4_request",
///     "host;x-amz-content-sha256",
///     "abc",
/// );
/// assert_eq!(
///     header,
///     "AWS4-HMAC-SHA256 Credential=AKID/20130524/us-east-1/s3/aws4_request,\
///      SignedHeaders=host;x-amz-content-sha256,Signature=abc"
/// );
/// ```
#[must_use]
pub fn build_authorization_header(
    access_key_id: &str,
    credential_scope: &str,
    signed_headers: &str,
    signature: &str,
) -> String {
    format!(
        "{SIGNING_ALGORITHM} Credential={access_key_id}/{credential_scope},\
         SignedHeaders={signed_headers},Signature={signature}"
    )
}

/// Parsed components of an AWS SigV4 `Authorization` header.
#[derive(Debug, Clone)]
pub struct ParsedAuth {
    /// The signing algorithm (must be `AWS4-HMAC-SHA256`).
    pub algorithm: String,
    /// The access key ID.
    pub access_key_id: String,
    /// The date component of the credential scope (YYYYMMDD).
    pub date: String,
    /// The AWS region from the credential scope.
    pub region: String,
    /// The AWS service from the credential scope.
    pub service: String,
    /// The list of signed header names (lowercase).
    pub signed_headers: Vec<String>,
    /// The hex-encoded signature.
    pub signature: String,
}

/// Parse an AWS SigV4 `Authorization` header value into its components.
///
/// # Errors
///
/// Returns [`AuthError::InvalidAuthHeader`] if the header format is invalid,
/// or [`AuthError::UnsupportedAlgorithm`] if the algorithm is not `AWS4-HMAC-SHA256`.
pub fn parse_authorization_header(header: &str) -> Result<ParsedAuth, AuthError> {
    let (algorithm, rest) = header.split_once(' ').ok_or(AuthError::InvalidAuthHeader)?;

    if algorithm != SIGNING_ALGORITHM {
        return Err(AuthError::UnsupportedAlgorithm(algorithm.to_owned()));
    }

    let mut credential = None;
    let mut signed_headers = None;
    let mut signature = None;

    for part in rest.split(',') {
        let part = part.trim();
        if let Some(value) = part.strip_prefix("Credential=") {
            credential = Some(value);
        } else if let Some(value) = part.strip_prefix("SignedHeaders=") {
            signed_headers = Some(value);
        } else if let Some(value) = part.strip_prefix("Signature=") {
            signature = Some(value);
        }
    }

    let credential = credential.ok_or(AuthError::InvalidAuthHeader)?;
    let signed_headers = signed_headers.ok_or(AuthError::InvalidAuthHeader)?;
    let signature = signature.ok_or(AuthError::InvalidAuthHeader)?;

    // AKID/date/region/service/aws4_request
    let cred_parts: Vec<&str> = credential.splitn(5, '/').collect();
    if cred_parts.len() != 5 || cred_parts[4] != SCOPE_TERMINATOR {
        return Err(AuthError::InvalidCredential);
    }

    Ok(ParsedAuth {
        algorithm: algorithm.to_owned(),
        access_key_id: cred_parts[0].to_owned(),
        date: cred_parts[1].to_owned(),
        region: cred_parts[2].to_owned(),
        service: cred_parts[3].to_owned(),
        signed_headers: signed_headers.split(';').map(ToOwned::to_owned).collect(),
        signature: signature.to_owned(),
    })
}

/// Compute the SHA-256 hash of the given payload and return it as a hex string.
///
/// This is the `x-amz-content-sha256` header value.
///
/// # Examples
///
/// ```
/// use s3request_auth::hash_payload;
///
/// assert_eq!(
///     hash_payload(b""),
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
/// );
/// ```
#[must_use]
pub fn hash_payload(payload: &[u8]) -> String {
    DigestAlgorithm::Sha256.hex_digest(payload)
}
