//! AWS integration for secmerge
//!
//! Implements [`secmerge_core::SecretStore`] on AWS Secrets Manager:
//! - [`AwsSecretStore`] talks to one region over the SDK or the `aws` CLI
//! - [`AwsConnector`] opens a store once the operator has picked a region

pub mod cli;
pub mod store;

// Re-export main types for convenience
pub use store::{AwsConnector, AwsMode, AwsSecretStore};
