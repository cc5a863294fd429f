//! Client configuration.
//!
//! Provides [`ClientConfig`], loaded from environment variables with the
//! usual AWS variable names for credentials and region.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::credentials::SigningCredentials;
use crate::error::{CoreError, CoreResult};
use crate::types::AwsRegion;

/// URL scheme used to reach the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain HTTP (the legacy wire shape).
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    /// The scheme as it appears in a URL.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(CoreError::InvalidEnvValue {
                name: "S3_SCHEME",
                value: s.to_owned(),
            }),
        }
    }
}

/// s3request client configuration.
///
/// # Examples
///
/// ```
/// use s3request_core::{ClientConfig, Scheme};
///
/// let config = ClientConfig::builder()
///     .access_key_id("AKID".to_owned())
///     .secret_access_key("secret".to_owned())
///     .region("eu-west-1".into())
///     .build();
/// assert_eq!(config.scheme, Scheme::Http);
/// assert!(!config.log_requests);
/// ```
#[derive(Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Access key id used in the credential scope.
    #[builder(default)]
    pub access_key_id: String,

    /// Secret access key. Never serialized.
    #[builder(default)]
    #[serde(skip_serializing, default)]
    pub secret_access_key: String,

    /// Region requests are signed for.
    #[builder(default)]
    pub region: AwsRegion,

    /// URL scheme for the service endpoint.
    #[builder(default)]
    pub scheme: Scheme,

    /// Log every request/response exchange at `info` level.
    #[builder(default = false)]
    pub log_requests: bool,

    /// Also send every request to this URL (debugging side channel).
    #[builder(default)]
    pub echo_request_to_url: Option<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: AwsRegion::default(),
            scheme: Scheme::Http,
            log_requests: false,
            echo_request_to_url: None,
            log_level: String::from("info"),
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("scheme", &self.scheme)
            .field("log_requests", &self.log_requests)
            .field("echo_request_to_url", &self.echo_request_to_url)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `AWS_ACCESS_KEY_ID` | *(empty)* |
    /// | `AWS_SECRET_ACCESS_KEY` | *(empty)* |
    /// | `AWS_REGION` / `DEFAULT_REGION` | `us-east-1` |
    /// | `S3_SCHEME` | `http` |
    /// | `S3_LOG_REQUESTS` | `false` |
    /// | `S3_ECHO_REQUEST_URL` | *(unset)* |
    /// | `LOG_LEVEL` | `info` |
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CoreResult<Self> {
        let mut config = Self::default();

        if let Some(v) = lookup("AWS_ACCESS_KEY_ID") {
            config.access_key_id = v;
        }
        if let Some(v) = lookup("AWS_SECRET_ACCESS_KEY") {
            config.secret_access_key = v;
        }
        if let Some(v) = lookup("AWS_REGION").or_else(|| lookup("DEFAULT_REGION")) {
            config.region = AwsRegion::new(v);
        }
        if let Some(v) = lookup("S3_SCHEME") {
            config.scheme = v.parse()?;
        }
        if let Some(v) = lookup("S3_LOG_REQUESTS") {
            config.log_requests = parse_bool("S3_LOG_REQUESTS", &v)?;
        }
        if let Some(v) = lookup("S3_ECHO_REQUEST_URL") {
            config.echo_request_to_url = Some(v).filter(|url| !url.is_empty());
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }

        Ok(config)
    }

    /// The signing credentials described by this configuration.
    pub fn credentials(&self) -> CoreResult<SigningCredentials> {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return Err(CoreError::Config(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must both be set".to_owned(),
            ));
        }
        Ok(SigningCredentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            self.region.clone(),
        ))
    }
}

fn parse_bool(name: &'static str, value: &str) -> CoreResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        _ => Err(CoreError::InvalidEnvValue {
            name,
            value: value.to_owned(),
        }),
    }
}
