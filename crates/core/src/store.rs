//! Secret store abstraction.
//!
//! [`SecretStore`] is the seam between the workflows and a concrete service.
//! `secmerge-aws` provides the AWS Secrets Manager implementation and
//! [`crate::memory::InMemoryStore`] an in-process one.

use crate::error::Result;
use crate::region::Region;
use crate::secret::SecretValue;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// A named pointer to one version of a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionStage {
    /// The version returned by default (`AWSCURRENT`).
    Current,
    /// The version that was current before the last change (`AWSPREVIOUS`).
    Previous,
}

impl VersionStage {
    /// Staging label as used by Secrets Manager.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Current => "AWSCURRENT",
            Self::Previous => "AWSPREVIOUS",
        }
    }
}

impl fmt::Display for VersionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One version of a secret as read from the store.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretVersion {
    /// Store-assigned version id.
    pub version_id: String,
    /// Raw secret string.
    pub secret_string: String,
}

impl fmt::Debug for SecretVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretVersion")
            .field("version_id", &self.version_id)
            .field("secret_string", &"[REDACTED]")
            .finish()
    }
}

/// Operations consumed from a remote secret store, bound to one region.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Region this store talks to.
    fn region(&self) -> Region;

    /// All secret names in the region, following every page.
    async fn list_secret_names(&self) -> Result<Vec<String>>;

    /// Read the version carrying `stage`.
    async fn get_secret(&self, secret_id: &str, stage: VersionStage) -> Result<SecretVersion>;

    /// Store a new value; the store makes it current. Returns the new version id.
    async fn put_secret(&self, secret_id: &str, secret_string: &str) -> Result<String>;

    /// Attach `stage` to `to_version_id`, detaching it from `from_version_id`.
    async fn move_stage(
        &self,
        secret_id: &str,
        stage: VersionStage,
        to_version_id: &str,
        from_version_id: Option<&str>,
    ) -> Result<()>;

    /// Read the current version and decode it as a flat JSON document.
    async fn get_secret_value(&self, secret_id: &str) -> Result<SecretValue> {
        let version = self.get_secret(secret_id, VersionStage::Current).await?;
        SecretValue::from_json(secret_id, &version.secret_string)
    }
}

#[async_trait]
impl<T: SecretStore + ?Sized> SecretStore for Arc<T> {
    fn region(&self) -> Region {
        (**self).region()
    }

    async fn list_secret_names(&self) -> Result<Vec<String>> {
        (**self).list_secret_names().await
    }

    async fn get_secret(&self, secret_id: &str, stage: VersionStage) -> Result<SecretVersion> {
        (**self).get_secret(secret_id, stage).await
    }

    async fn put_secret(&self, secret_id: &str, secret_string: &str) -> Result<String> {
        (**self).put_secret(secret_id, secret_string).await
    }

    async fn move_stage(
        &self,
        secret_id: &str,
        stage: VersionStage,
        to_version_id: &str,
        from_version_id: Option<&str>,
    ) -> Result<()> {
        (**self)
            .move_stage(secret_id, stage, to_version_id, from_version_id)
            .await
    }
}

/// Opens a [`SecretStore`] for a region once the operator has picked one.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Connect to the store serving `region`.
    async fn connect(&self, region: Region) -> Result<Box<dyn SecretStore>>;
}
