//! Live integration tests for s3request.
//!
//! These tests talk to real S3 and need credentials plus a bucket the
//! credentials may write to:
//!
//! ```text
//! AWS_ACCESS_KEY_ID=...
//! AWS_SECRET_ACCESS_KEY=...
//! AWS_REGION=us-east-1
//! S3_TEST_BUCKET=my-scratch-bucket
//! ```
//!
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p s3request-integration -- --ignored
//! ```

use std::sync::Once;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use s3request_client::S3Service;
use s3request_core::ClientConfig;

static INIT: Once = Once::new();

/// Initialize tracing (once). `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
            )
            .with_test_writer()
            .init();
    });
}

/// Client configuration from the environment.
#[must_use]
pub fn test_config() -> ClientConfig {
    let config =
        ClientConfig::from_env().unwrap_or_else(|e| panic!("invalid test environment: {e}"));
    init_tracing(&config.log_level);
    config
}

/// The bucket tests write to.
#[must_use]
pub fn test_bucket() -> String {
    std::env::var("S3_TEST_BUCKET").unwrap_or_else(|_| panic!("S3_TEST_BUCKET must be set"))
}

/// A service signing with the environment's credentials.
#[must_use]
pub fn s3_service() -> S3Service {
    S3Service::from_config(&test_config())
        .unwrap_or_else(|e| panic!("failed to create service: {e}"))
}

/// An AWS SDK client for the same account and region, used to cross-check
/// what the service wrote.
pub async fn sdk_client() -> aws_sdk_s3::Client {
    let config = test_config();
    let sdk_config = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(config.region.as_str().to_owned()))
        .load()
        .await;
    aws_sdk_s3::Client::new(&sdk_config)
}

/// Generate a unique object key for a test.
#[must_use]
pub fn test_key(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("s3request-it/{prefix}-{id}.txt")
}

/// Remove `key` from `bucket`, ignoring failures.
pub async fn cleanup_object(client: &aws_sdk_s3::Client, bucket: &str, key: &str) {
    let _ = client.delete_object().bucket(bucket).key(key).send().await;
}

mod test_error;
mod test_object;
