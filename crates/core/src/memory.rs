//! In-process secret store with Secrets Manager staging semantics.
//!
//! Used for dry runs and tests. `put` makes the new version current and the
//! old current version previous; moving `AWSCURRENT` requires naming the
//! version it is detached from, and demotes that version to previous.

use crate::error::{Error, Result};
use crate::region::Region;
use crate::store::{SecretStore, SecretVersion, StoreConnector, VersionStage};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct StoredSecret {
    /// version id -> secret string
    versions: HashMap<String, String>,
    /// stage -> version id
    stages: HashMap<VersionStage, String>,
}

/// Secret store kept entirely in memory.
#[derive(Debug)]
pub struct InMemoryStore {
    region: Region,
    secrets: Mutex<BTreeMap<String, StoredSecret>>,
    next_version: AtomicU64,
    writes: AtomicUsize,
}

impl InMemoryStore {
    /// Create an empty store for `region`.
    #[must_use]
    pub fn new(region: Region) -> Self {
        Self {
            region,
            secrets: Mutex::new(BTreeMap::new()),
            next_version: AtomicU64::new(1),
            writes: AtomicUsize::new(0),
        }
    }

    /// Seed a secret with an initial current value. Not counted as a write.
    #[must_use]
    pub fn with_secret(self, secret_id: &str, secret_string: &str) -> Self {
        if let Ok(mut secrets) = self.secrets.lock() {
            let version_id = self.allocate_version();
            let entry = secrets.entry(secret_id.to_string()).or_default();
            Self::install(entry, version_id, secret_string);
        }
        self
    }

    /// Current secret string, if the secret exists.
    #[must_use]
    pub fn current_string(&self, secret_id: &str) -> Option<String> {
        let secrets = self.secrets.lock().ok()?;
        let secret = secrets.get(secret_id)?;
        let version = secret.stages.get(&VersionStage::Current)?;
        secret.versions.get(version).cloned()
    }

    /// Version id carrying `stage`, if any.
    #[must_use]
    pub fn stage_version(&self, secret_id: &str, stage: VersionStage) -> Option<String> {
        let secrets = self.secrets.lock().ok()?;
        secrets.get(secret_id)?.stages.get(&stage).cloned()
    }

    /// Number of mutating calls (`put_secret`, `move_stage`) served so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn allocate_version(&self) -> String {
        format!("v{}", self.next_version.fetch_add(1, Ordering::SeqCst))
    }

    fn install(secret: &mut StoredSecret, version_id: String, secret_string: &str) {
        if let Some(old) = secret.stages.remove(&VersionStage::Current) {
            secret.stages.insert(VersionStage::Previous, old);
        }
        secret
            .versions
            .insert(version_id.clone(), secret_string.to_string());
        secret.stages.insert(VersionStage::Current, version_id);
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, BTreeMap<String, StoredSecret>>> {
        self.secrets
            .lock()
            .map_err(|_| Error::store(operation, "", "in-memory store lock poisoned"))
    }
}

fn not_found(operation: &'static str, secret_id: &str) -> Error {
    Error::store(
        operation,
        secret_id,
        "ResourceNotFoundException: secret does not exist",
    )
}

#[async_trait]
impl SecretStore for InMemoryStore {
    fn region(&self) -> Region {
        self.region
    }

    async fn list_secret_names(&self) -> Result<Vec<String>> {
        Ok(self.lock("list")?.keys().cloned().collect())
    }

    async fn get_secret(&self, secret_id: &str, stage: VersionStage) -> Result<SecretVersion> {
        let secrets = self.lock("get")?;
        let secret = secrets
            .get(secret_id)
            .ok_or_else(|| not_found("get", secret_id))?;

        let Some(version_id) = secret.stages.get(&stage) else {
            return Err(match stage {
                VersionStage::Previous => Error::NoPreviousVersion {
                    secret_id: secret_id.to_string(),
                },
                VersionStage::Current => not_found("get", secret_id),
            });
        };

        let secret_string = secret
            .versions
            .get(version_id)
            .cloned()
            .ok_or_else(|| not_found("get", secret_id))?;
        Ok(SecretVersion {
            version_id: version_id.clone(),
            secret_string,
        })
    }

    async fn put_secret(&self, secret_id: &str, secret_string: &str) -> Result<String> {
        let mut secrets = self.lock("put")?;
        let secret = secrets
            .get_mut(secret_id)
            .ok_or_else(|| not_found("put", secret_id))?;

        let version_id = self.allocate_version();
        Self::install(secret, version_id.clone(), secret_string);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(version_id)
    }

    async fn move_stage(
        &self,
        secret_id: &str,
        stage: VersionStage,
        to_version_id: &str,
        from_version_id: Option<&str>,
    ) -> Result<()> {
        let mut secrets = self.lock("move-stage")?;
        let secret = secrets
            .get_mut(secret_id)
            .ok_or_else(|| not_found("move-stage", secret_id))?;

        if !secret.versions.contains_key(to_version_id) {
            return Err(Error::store(
                "move-stage",
                secret_id,
                format!("version {to_version_id} does not exist"),
            ));
        }

        let attached = secret.stages.get(&stage).cloned();
        if let Some(attached) = &attached
            && attached != to_version_id
            && from_version_id != Some(attached.as_str())
        {
            return Err(Error::store(
                "move-stage",
                secret_id,
                format!("{stage} is attached to {attached}; RemoveFromVersionId must name it"),
            ));
        }

        secret.stages.insert(stage, to_version_id.to_string());
        if stage == VersionStage::Current
            && let Some(old) = attached.filter(|old| old != to_version_id)
        {
            secret.stages.insert(VersionStage::Previous, old);
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Connector handing out pre-built in-memory stores by region.
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    stores: HashMap<Region, Arc<InMemoryStore>>,
}

impl InMemoryConnector {
    /// Create a connector with no stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the store served for its region.
    #[must_use]
    pub fn with_store(mut self, store: Arc<InMemoryStore>) -> Self {
        self.stores.insert(store.region(), store);
        self
    }
}

#[async_trait]
impl StoreConnector for InMemoryConnector {
    async fn connect(&self, region: Region) -> Result<Box<dyn SecretStore>> {
        let store = self
            .stores
            .get(&region)
            .cloned()
            .unwrap_or_else(|| Arc::new(InMemoryStore::new(region)));
        Ok(Box::new(store))
    }
}
