//! Secrets Manager access through the `aws` command-line tool.
//!
//! Used when no SDK credentials are present in the environment, so whatever
//! the CLI is configured with (SSO sessions, credential processes) applies.

use secmerge_core::{Error, Result, SecretVersion, VersionStage};
use serde::Deserialize;
use std::io::Write;
use tokio::process::Command;

const NOT_FOUND: &str = "ResourceNotFoundException";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GetSecretValueResponse {
    version_id: String,
    secret_string: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PutSecretValueResponse {
    version_id: String,
}

/// Runs `aws secretsmanager` subcommands against one region.
#[derive(Debug, Clone)]
pub struct AwsCli {
    program: String,
    region: &'static str,
}

impl AwsCli {
    /// Use the `aws` executable from `PATH`.
    #[must_use]
    pub fn new(region: &'static str) -> Self {
        Self {
            program: "aws".to_string(),
            region,
        }
    }

    /// Full argument list for a `secretsmanager` subcommand.
    fn args(&self, operation: &str, extra: &[&str]) -> Vec<String> {
        let mut args = vec!["secretsmanager".to_string(), operation.to_string()];
        args.extend(extra.iter().map(|arg| (*arg).to_string()));
        args.extend([
            "--region".to_string(),
            self.region.to_string(),
            "--output".to_string(),
            "json".to_string(),
        ]);
        args
    }

    async fn run(&self, operation: &'static str, secret_id: &str, args: &[String]) -> Result<Vec<u8>> {
        tracing::debug!(operation, secret_id, region = self.region, "Running aws CLI");

        let output = Command::new(&self.program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                Error::store(operation, secret_id, format!("Failed to execute aws CLI: {e}"))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::store(
                operation,
                secret_id,
                format!("aws CLI failed: {}", stderr.trim()),
            ));
        }
        Ok(output.stdout)
    }

    pub(crate) async fn list_secret_names(&self) -> Result<Vec<String>> {
        let args = self.args("list-secrets", &["--query", "SecretList[].Name"]);
        let stdout = self.run("list", "", &args).await?;
        let names: Option<Vec<String>> = serde_json::from_slice(&stdout)
            .map_err(|e| Error::store("list", "", format!("Unexpected aws CLI output: {e}")))?;
        Ok(names.unwrap_or_default())
    }

    pub(crate) async fn get_secret(
        &self,
        secret_id: &str,
        stage: VersionStage,
    ) -> Result<SecretVersion> {
        let args = self.args(
            "get-secret-value",
            &["--secret-id", secret_id, "--version-stage", stage.label()],
        );
        let stdout = match self.run("get", secret_id, &args).await {
            Err(e) if stage == VersionStage::Previous && is_not_found(&e) => {
                return Err(Error::NoPreviousVersion {
                    secret_id: secret_id.to_string(),
                });
            }
            other => other?,
        };
        parse_get_response(secret_id, &stdout)
    }

    pub(crate) async fn put_secret(&self, secret_id: &str, secret_string: &str) -> Result<String> {
        // Pass the value through a private temp file so it never shows up in
        // the process list
        let mut file = tempfile::NamedTempFile::new()
            .map_err(|e| Error::io("create", std::env::temp_dir(), e))?;
        file.write_all(secret_string.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::io("write", file.path(), e))?;
        let file_arg = format!("file://{}", file.path().display());

        let args = self.args(
            "put-secret-value",
            &["--secret-id", secret_id, "--secret-string", &file_arg],
        );
        let stdout = self.run("put", secret_id, &args).await?;
        let response: PutSecretValueResponse = serde_json::from_slice(&stdout)
            .map_err(|e| Error::store("put", secret_id, format!("Unexpected aws CLI output: {e}")))?;
        Ok(response.version_id)
    }

    pub(crate) async fn move_stage(
        &self,
        secret_id: &str,
        stage: VersionStage,
        to_version_id: &str,
        from_version_id: Option<&str>,
    ) -> Result<()> {
        let mut extra = vec![
            "--secret-id",
            secret_id,
            "--version-stage",
            stage.label(),
            "--move-to-version-id",
            to_version_id,
        ];
        if let Some(from) = from_version_id {
            extra.extend(["--remove-from-version-id", from]);
        }
        let args = self.args("update-secret-version-stage", &extra);
        self.run("move-stage", secret_id, &args).await?;
        Ok(())
    }
}

fn is_not_found(error: &Error) -> bool {
    matches!(error, Error::Store { message, .. } if message.contains(NOT_FOUND))
}

fn parse_get_response(secret_id: &str, stdout: &[u8]) -> Result<SecretVersion> {
    let response: GetSecretValueResponse = serde_json::from_slice(stdout)
        .map_err(|e| Error::store("get", secret_id, format!("Unexpected aws CLI output: {e}")))?;
    let secret_string = response.secret_string.ok_or_else(|| {
        Error::store("get", secret_id, "Secret has no string value (may be binary)")
    })?;
    Ok(SecretVersion {
        version_id: response.version_id,
        secret_string,
    })
}
