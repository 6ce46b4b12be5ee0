//! AWS Secrets Manager store with auto-negotiating dual-mode (HTTP + CLI)

use crate::cli::AwsCli;
use async_trait::async_trait;
use aws_sdk_secretsmanager::Client;
use aws_sdk_secretsmanager::error::DisplayErrorContext;
use secmerge_core::{
    Error, Region, Result, SecretStore, SecretVersion, StoreConnector, VersionStage,
};

/// How to reach Secrets Manager.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AwsMode {
    /// SDK when credentials are visible in the environment, CLI otherwise
    #[default]
    Auto,
    /// Always use the SDK (HTTP)
    Sdk,
    /// Always shell out to the `aws` CLI
    Cli,
}

enum Backend {
    Sdk(Client),
    Cli(AwsCli),
}

/// [`SecretStore`] backed by AWS Secrets Manager in one region.
///
/// Mode is negotiated in [`AwsMode::Auto`]:
/// - If `AWS_ACCESS_KEY_ID` and `AWS_SECRET_ACCESS_KEY`, or `AWS_PROFILE`, are set → HTTP mode
/// - Otherwise → CLI mode (uses `aws` CLI)
pub struct AwsSecretStore {
    region: Region,
    backend: Backend,
}

impl std::fmt::Debug for AwsSecretStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsSecretStore")
            .field("region", &self.region.aws_region())
            .field("mode", &self.mode_name())
            .finish()
    }
}

impl AwsMode {
    /// Whether this mode talks to the SDK, given a check for set environment
    /// variables. `Auto` needs a static key pair or a profile.
    fn selects_sdk(self, is_set: impl Fn(&str) -> bool) -> bool {
        match self {
            Self::Auto => {
                (is_set("AWS_ACCESS_KEY_ID") && is_set("AWS_SECRET_ACCESS_KEY"))
                    || is_set("AWS_PROFILE")
            }
            Self::Sdk => true,
            Self::Cli => false,
        }
    }
}

impl AwsSecretStore {
    /// Open a store for `region`.
    ///
    /// In SDK mode the shared AWS configuration (credentials chain, profile)
    /// is loaded with the region pinned to the selected one.
    pub async fn connect(region: Region, mode: AwsMode) -> Self {
        let use_sdk = mode.selects_sdk(|var| std::env::var(var).is_ok());

        let backend = if use_sdk {
            let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_sdk_secretsmanager::config::Region::new(region.aws_region()))
                .load()
                .await;
            Backend::Sdk(Client::new(&config))
        } else {
            Backend::Cli(AwsCli::new(region.aws_region()))
        };

        let store = Self { region, backend };
        tracing::debug!(region = region.aws_region(), mode = store.mode_name(), "Connected to Secrets Manager");
        store
    }

    /// `"http"` or `"cli"`.
    #[must_use]
    pub const fn mode_name(&self) -> &'static str {
        match self.backend {
            Backend::Sdk(_) => "http",
            Backend::Cli(_) => "cli",
        }
    }
}

fn sdk_error(operation: &'static str, secret_id: &str, error: impl std::error::Error) -> Error {
    Error::store(
        operation,
        secret_id,
        format!("AWS Secrets Manager error: {}", DisplayErrorContext(error)),
    )
}

async fn sdk_list(client: &Client) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let mut pages = client.list_secrets().into_paginator().send();
    while let Some(page) = pages.next().await {
        let page = page.map_err(|e| sdk_error("list", "", e))?;
        names.extend(
            page.secret_list()
                .iter()
                .filter_map(|entry| entry.name().map(str::to_string)),
        );
    }
    Ok(names)
}

async fn sdk_get(client: &Client, secret_id: &str, stage: VersionStage) -> Result<SecretVersion> {
    let response = client
        .get_secret_value()
        .secret_id(secret_id)
        .version_stage(stage.label())
        .send()
        .await
        .map_err(|e| {
            let not_found = e
                .as_service_error()
                .is_some_and(|se| se.is_resource_not_found_exception());
            if not_found && stage == VersionStage::Previous {
                Error::NoPreviousVersion {
                    secret_id: secret_id.to_string(),
                }
            } else {
                sdk_error("get", secret_id, e)
            }
        })?;

    let secret_string = response.secret_string().ok_or_else(|| {
        Error::store("get", secret_id, "Secret has no string value (may be binary)")
    })?;
    let version_id = response
        .version_id()
        .ok_or_else(|| Error::store("get", secret_id, "Response carries no version id"))?;

    Ok(SecretVersion {
        version_id: version_id.to_string(),
        secret_string: secret_string.to_string(),
    })
}

async fn sdk_put(client: &Client, secret_id: &str, secret_string: &str) -> Result<String> {
    let response = client
        .put_secret_value()
        .secret_id(secret_id)
        .secret_string(secret_string)
        .send()
        .await
        .map_err(|e| sdk_error("put", secret_id, e))?;

    response
        .version_id()
        .map(str::to_string)
        .ok_or_else(|| Error::store("put", secret_id, "Response carries no version id"))
}

async fn sdk_move_stage(
    client: &Client,
    secret_id: &str,
    stage: VersionStage,
    to_version_id: &str,
    from_version_id: Option<&str>,
) -> Result<()> {
    client
        .update_secret_version_stage()
        .secret_id(secret_id)
        .version_stage(stage.label())
        .move_to_version_id(to_version_id)
        .set_remove_from_version_id(from_version_id.map(str::to_string))
        .send()
        .await
        .map_err(|e| sdk_error("move-stage", secret_id, e))?;
    Ok(())
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    fn region(&self) -> Region {
        self.region
    }

    async fn list_secret_names(&self) -> Result<Vec<String>> {
        let mut names = match &self.backend {
            Backend::Sdk(client) => sdk_list(client).await?,
            Backend::Cli(cli) => cli.list_secret_names().await?,
        };
        names.sort();
        tracing::debug!(count = names.len(), "Listed secrets");
        Ok(names)
    }

    async fn get_secret(&self, secret_id: &str, stage: VersionStage) -> Result<SecretVersion> {
        match &self.backend {
            Backend::Sdk(client) => sdk_get(client, secret_id, stage).await,
            Backend::Cli(cli) => cli.get_secret(secret_id, stage).await,
        }
    }

    async fn put_secret(&self, secret_id: &str, secret_string: &str) -> Result<String> {
        match &self.backend {
            Backend::Sdk(client) => sdk_put(client, secret_id, secret_string).await,
            Backend::Cli(cli) => cli.put_secret(secret_id, secret_string).await,
        }
    }

    async fn move_stage(
        &self,
        secret_id: &str,
        stage: VersionStage,
        to_version_id: &str,
        from_version_id: Option<&str>,
    ) -> Result<()> {
        match &self.backend {
            Backend::Sdk(client) => {
                sdk_move_stage(client, secret_id, stage, to_version_id, from_version_id).await
            }
            Backend::Cli(cli) => {
                cli.move_stage(secret_id, stage, to_version_id, from_version_id)
                    .await
            }
        }
    }
}

/// [`StoreConnector`] opening an [`AwsSecretStore`] per selected region.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsConnector {
    mode: AwsMode,
}

impl AwsConnector {
    /// Connector using `mode` for every store it opens.
    #[must_use]
    pub const fn new(mode: AwsMode) -> Self {
        Self { mode }
    }
}

#[async_trait]
impl StoreConnector for AwsConnector {
    async fn connect(&self, region: Region) -> Result<Box<dyn SecretStore>> {
        Ok(Box::new(AwsSecretStore::connect(region, self.mode).await))
    }
}
