//! Common AWS type definitions.

use std::fmt;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region used when nothing else is configured.
    pub const DEFAULT: &str = "us-east-1";

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Virtual-hosted-style S3 host name for `bucket` in this region.
    ///
    /// The bucket is lower-cased; the region is used as given.
    ///
    /// # Examples
    ///
    /// ```
    /// use s3request_core::AwsRegion;
    ///
    /// let region = AwsRegion::new("us-west-2");
    /// assert_eq!(region.s3_host("My-Bucket"), "my-bucket.s3.us-west-2.amazonaws.com");
    /// ```
    #[must_use]
    pub fn s3_host(&self, bucket: &str) -> String {
        format!("{}.s3.{}.amazonaws.com", bucket.to_lowercase(), self.0)
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AwsRegion {
    fn from(region: &str) -> Self {
        Self::new(region)
    }
}
