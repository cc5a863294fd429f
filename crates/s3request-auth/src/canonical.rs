//! Canonical request construction for AWS Signature Version 4.
//!
//! The canonical request has the shape:
//!
//! ```text
//! HTTPRequestMethod\n
//! CanonicalURI\n
//! CanonicalQueryString\n
//! CanonicalHeaders\n\n
//! SignedHeaders\n
//! HashedPayload
//! ```
//!
//! The query string is always empty. Header values are emitted exactly as
//! they are sent on the wire, so no trimming or whitespace folding happens
//! here.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters that are percent-encoded in a path segment under
/// [`KeyEncoding::Rfc3986`]: everything except the RFC 3986 unreserved set.
const URI_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How an object key is rendered into the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyEncoding {
    /// Use the key exactly as given, in both the URL and the canonical request.
    ///
    /// Keys containing reserved URL characters (spaces, `?`, `#`, `%`, ...)
    /// will not verify.
    #[default]
    Verbatim,
    /// Percent-encode each `/`-separated segment with the SigV4 URI rules.
    Rfc3986,
}

/// Build the request path (`/` + object key) for the given encoding.
///
/// The same string is used as the URL path and as the canonical URI.
///
/// # Examples
///
/// ```
/// use s3request_auth::canonical::build_canonical_uri;
/// use s3request_auth::KeyEncoding;
///
/// assert_eq!(build_canonical_uri("test.txt", KeyEncoding::Verbatim), "/test.txt");
/// assert_eq!(build_canonical_uri("a b/c", KeyEncoding::Verbatim), "/a b/c");
/// assert_eq!(build_canonical_uri("a b/c", KeyEncoding::Rfc3986), "/a%20b/c");
/// ```
#[must_use]
pub fn build_canonical_uri(object_key: &str, encoding: KeyEncoding) -> String {
    match encoding {
        KeyEncoding::Verbatim => format!("/{object_key}"),
        KeyEncoding::Rfc3986 => {
            let encoded: Vec<String> = object_key
                .split('/')
                .map(|segment| utf8_percent_encode(segment, URI_ENCODE_SET).to_string())
                .collect();
            format!("/{}", encoded.join("/"))
        }
    }
}

/// The case-folded, sorted header set that is both signed and listed in
/// `SignedHeaders`.
///
/// Names are lower-cased; when two names fold to the same key the later one
/// wins. The `host` header is always present and always overrides any
/// caller-supplied `Host`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalHeaders {
    headers: BTreeMap<String, String>,
}

impl CanonicalHeaders {
    /// Fold `headers` and inject the `host` header.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3request_auth::CanonicalHeaders;
    ///
    /// let headers = CanonicalHeaders::new([("Zeta", "1"), ("alpha", "2")], "b.s3.us-east-1.amazonaws.com");
    /// assert_eq!(headers.signed_headers(), "alpha;host;zeta");
    /// ```
    pub fn new<'a, I>(headers: I, host: &str) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut folded: BTreeMap<String, String> = headers
            .into_iter()
            .map(|(name, value)| (name.to_lowercase(), value.to_owned()))
            .collect();
        folded.insert("host".to_owned(), host.to_owned());
        Self { headers: folded }
    }

    /// Lower-cased header names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.headers.keys().map(String::as_str)
    }

    /// Value of a lower-cased header name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Number of signed headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Always `false`: `host` is injected on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The `SignedHeaders` value: sorted names joined by `;`.
    #[must_use]
    pub fn signed_headers(&self) -> String {
        self.names().collect::<Vec<_>>().join(";")
    }

    /// The canonical headers block, one `name:value` per line, without a
    /// trailing newline.
    #[must_use]
    pub fn canonical_block(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{name}:{value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Build the full canonical request string.
///
/// # Examples
///
/// ```
/// use s3request_auth::canonical::build_canonical_request;
/// use s3request_auth::CanonicalHeaders;
///
/// let headers = CanonicalHeaders::new([], "examplebucket.s3.amazonaws.com");
/// let canonical = build_canonical_request(
///     "GET",
///     "/test.txt",
///     &headers,
///     "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855",
/// );
/// assert!(canonical.starts_with("GET\n/test.txt\n\nhost:"));
/// ```
#[must_use]
pub fn build_canonical_request(
    method: &str,
    canonical_uri: &str,
    headers: &CanonicalHeaders,
    payload_hash: &str,
) -> String {
    format!(
        "{method}\n{canonical_uri}\n\n{}\n\n{}\n{payload_hash}",
        headers.canonical_block(),
        headers.signed_headers()
    )
}
