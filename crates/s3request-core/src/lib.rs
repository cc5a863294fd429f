//! Core types, credentials, and configuration for s3request.
//!
//! This crate provides the building blocks shared by the signing engine and
//! the request dispatcher: the region type, the long-lived signing
//! credentials, and the environment-driven client configuration.

mod config;
mod credentials;
mod error;
mod types;

pub use config::{ClientConfig, Scheme};
pub use credentials::SigningCredentials;
pub use error::{CoreError, CoreResult};
pub use types::AwsRegion;
