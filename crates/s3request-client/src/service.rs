//! Single-object operations on top of the [`Dispatcher`].

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use s3request_auth::DigestAlgorithm;
use s3request_core::{ClientConfig, CoreResult, Scheme, SigningCredentials};
use tracing::debug;

use crate::dispatcher::{DispatchOptions, Dispatcher};
use crate::error::S3RequestResult;
use crate::exchange::Exchange;
use crate::request::{Blob, HttpMethod, RequestSpec, RequestSpecBuilder};
use crate::transport::{HttpTransport, ReqwestTransport};

/// An S3 client bound to one set of credentials.
///
/// Cheap to clone and safe to share across tasks: every call builds its own
/// request and gets its own exchange log back.
///
/// # Examples
///
/// ```no_run
/// use s3request_client::{Blob, S3Service};
/// use s3request_core::ClientConfig;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let service = S3Service::from_config(&ClientConfig::from_env()?)?;
/// service
///     .put_object("my-bucket", "notes/hello.txt", Blob::new("hello", "text/plain"))
///     .await?;
/// let exchange = service.get_object("my-bucket", "notes/hello.txt").await?;
/// assert_eq!(exchange.response.text(), "hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct S3Service {
    dispatcher: Dispatcher,
    options: DispatchOptions,
}

impl S3Service {
    /// Create a service that sends through `transport`.
    pub fn new(credentials: SigningCredentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            dispatcher: Dispatcher::new(credentials, transport),
            options: DispatchOptions::default(),
        }
    }

    /// Create a `reqwest`-backed service from `config`.
    ///
    /// # Errors
    ///
    /// Fails when the configuration carries no credentials.
    pub fn from_config(config: &ClientConfig) -> CoreResult<Self> {
        let credentials = config.credentials()?;
        debug!(region = %credentials.region(), scheme = %config.scheme, "Creating S3 service");
        Ok(Self::new(credentials, Arc::new(ReqwestTransport::new()))
            .with_scheme(config.scheme)
            .with_options(DispatchOptions::from(config)))
    }

    /// Use `options` for every call.
    #[must_use]
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Use `scheme` for request URLs.
    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.dispatcher = self.dispatcher.with_scheme(scheme);
        self
    }

    /// The dispatch options applied to every call.
    #[must_use]
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// The underlying dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// A fresh request builder stamped with the current time.
    #[must_use]
    pub fn request(&self) -> RequestSpecBuilder {
        RequestSpecBuilder::new()
    }

    /// Sign and send `spec` with this service's options.
    pub async fn execute(&self, spec: &RequestSpec) -> S3RequestResult<Exchange> {
        self.dispatcher.execute(spec, &self.options).await
    }

    /// Upload `blob` as `bucket/key`, with a `Content-MD5` integrity check.
    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        blob: Blob,
    ) -> S3RequestResult<Exchange> {
        let content_md5 = STANDARD.encode(DigestAlgorithm::Md5.digest(blob.data.as_bytes()));
        let spec = self
            .request()
            .http_method(HttpMethod::Put)
            .bucket(bucket)?
            .object_key(key)?
            .header("Content-MD5", &content_md5)?
            .blob(blob)?
            .build()?;
        self.execute(&spec).await
    }

    /// Download `bucket/key`.
    pub async fn get_object(&self, bucket: &str, key: &str) -> S3RequestResult<Exchange> {
        let spec = self.object_request(HttpMethod::Get, bucket, key)?;
        self.execute(&spec).await
    }

    /// Delete `bucket/key`.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> S3RequestResult<Exchange> {
        let spec = self.object_request(HttpMethod::Delete, bucket, key)?;
        self.execute(&spec).await
    }

    fn object_request(
        &self,
        method: HttpMethod,
        bucket: &str,
        key: &str,
    ) -> S3RequestResult<RequestSpec> {
        Ok(self
            .request()
            .http_method(method)
            .bucket(bucket)?
            .object_key(key)?
            .build()?)
    }
}
