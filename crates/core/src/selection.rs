//! Interactive choice of region, secret and override file.

use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::region::Region;
use crate::store::{SecretStore, StoreConnector};
use secmerge_events::{
    emit_override_file_missing, emit_override_file_selected, emit_region_selected,
    emit_secret_selected,
};
use std::path::{Path, PathBuf};

/// Prompt text for the region menu.
pub const REGION_PROMPT: &str = "Select Region";
/// Prompt text for the secret menu.
pub const SECRET_PROMPT: &str = "Select Secret";
/// Prompt text for the override file name.
pub const FILE_PROMPT: &str = "Name of file with secrets (in current directory)";

/// What the operator picked for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSelection {
    /// Secret name or ARN.
    pub secret_id: String,
    /// Region the secret lives in.
    pub region: Region,
    /// Existing override file, when the workflow needs one.
    pub override_file: Option<PathBuf>,
}

/// Answers supplied up front plus the directory file names resolve against.
#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Skip the region menu.
    pub region: Option<Region>,
    /// Skip the secret menu.
    pub secret_id: Option<String>,
    /// Skip the file prompt. Relative paths resolve against `base_dir`.
    pub override_file: Option<PathBuf>,
    /// Directory for override file names and the review file.
    pub base_dir: PathBuf,
}

/// A completed selection with the store it was made against.
pub struct Session {
    /// The operator's choices.
    pub selection: SecretSelection,
    /// Store for the selected region.
    pub store: Box<dyn SecretStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

/// Walk the operator through region, secret and (optionally) file choice.
///
/// The file prompt repeats until an existing path is entered.
///
/// # Errors
/// Returns store errors from connecting or listing, [`Error::NoSecrets`] for
/// an empty region, [`Error::MissingOverrideFile`] for a preselected file
/// that does not exist, and prompt errors.
pub async fn select_secret(
    prompter: &mut dyn Prompter,
    connector: &dyn StoreConnector,
    options: &SelectionOptions,
    needs_override_file: bool,
) -> Result<Session> {
    let region = match options.region {
        Some(region) => region,
        None => {
            let codes: Vec<String> = Region::ALL.iter().map(|r| r.code().to_string()).collect();
            Region::ALL[prompter.select(REGION_PROMPT, &codes)?]
        }
    };
    tracing::debug!(region = %region, aws_region = region.aws_region(), "Region chosen");

    let store = connector.connect(region).await?;

    let secret_id = match &options.secret_id {
        Some(secret_id) => secret_id.clone(),
        None => {
            let mut names = store.list_secret_names().await?;
            if names.is_empty() {
                return Err(Error::NoSecrets {
                    region: region.aws_region().to_string(),
                });
            }
            names.sort();
            let index = prompter.select(SECRET_PROMPT, &names)?;
            names.swap_remove(index)
        }
    };

    let override_file = if needs_override_file {
        Some(match &options.override_file {
            Some(path) => {
                let path = options.base_dir.join(path);
                if !path.is_file() {
                    return Err(Error::MissingOverrideFile { path });
                }
                path
            }
            None => prompt_override_file(prompter, &options.base_dir)?,
        })
    } else {
        None
    };

    emit_region_selected!(region.code(), region.aws_region());
    emit_secret_selected!(secret_id);
    if let Some(path) = &override_file {
        emit_override_file_selected!(path.display());
    }

    Ok(Session {
        selection: SecretSelection {
            secret_id,
            region,
            override_file,
        },
        store,
    })
}

fn prompt_override_file(prompter: &mut dyn Prompter, base_dir: &Path) -> Result<PathBuf> {
    loop {
        let file_name = prompter.input(FILE_PROMPT)?;
        let path = base_dir.join(file_name.trim());
        if !file_name.trim().is_empty() && path.is_file() {
            return Ok(path);
        }
        emit_override_file_missing!(file_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{InMemoryConnector, InMemoryStore};
    use crate::prompt::{Answer, ScriptedPrompter};
    use std::sync::Arc;

    fn connector() -> InMemoryConnector {
        InMemoryConnector::new().with_store(Arc::new(
            InMemoryStore::new(Region::Uk)
                .with_secret("payments/api", "{}")
                .with_secret("auth/jwt", "{}"),
        ))
    }

    fn choose(text: &str) -> Answer {
        Answer::Choose(text.to_string())
    }

    #[tokio::test]
    async fn test_full_interactive_selection() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prod.env"), "A=1\n").unwrap();

        let mut prompter = ScriptedPrompter::new([
            choose("uk"),
            choose("payments/api"),
            Answer::Text("missing.env".to_string()),
            Answer::Text(String::new()),
            Answer::Text("prod.env".to_string()),
        ]);
        let options = SelectionOptions {
            base_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let session = select_secret(&mut prompter, &connector(), &options, true)
            .await
            .unwrap();

        assert_eq!(
            session.selection,
            SecretSelection {
                secret_id: "payments/api".to_string(),
                region: Region::Uk,
                override_file: Some(dir.path().join("prod.env")),
            }
        );
        assert_eq!(
            prompter.asked(),
            [REGION_PROMPT, SECRET_PROMPT, FILE_PROMPT, FILE_PROMPT, FILE_PROMPT]
        );
    }

    #[tokio::test]
    async fn test_preselected_values_skip_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("over.env"), "").unwrap();

        let mut prompter = ScriptedPrompter::default();
        let options = SelectionOptions {
            region: Some(Region::Uk),
            secret_id: Some("not/listed".to_string()),
            override_file: Some(PathBuf::from("over.env")),
            base_dir: dir.path().to_path_buf(),
        };

        let session = select_secret(&mut prompter, &connector(), &options, true)
            .await
            .unwrap();
        assert_eq!(session.selection.secret_id, "not/listed");
        assert!(prompter.asked().is_empty());
    }

    #[tokio::test]
    async fn test_file_prompt_skipped_when_not_needed() {
        let mut prompter = ScriptedPrompter::new([choose("uk"), choose("auth/jwt")]);
        let session = select_secret(
            &mut prompter,
            &connector(),
            &SelectionOptions::default(),
            false,
        )
        .await
        .unwrap();
        assert!(session.selection.override_file.is_none());
        assert_eq!(prompter.remaining(), 0);
    }

    #[tokio::test]
    async fn test_empty_region_is_an_error() {
        let mut prompter = ScriptedPrompter::new([choose("ca")]);
        let err = select_secret(
            &mut prompter,
            &connector(),
            &SelectionOptions::default(),
            false,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::NoSecrets { region } if region == "ca-central-1"));
    }

    #[tokio::test]
    async fn test_preselected_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = SelectionOptions {
            region: Some(Region::Uk),
            secret_id: Some("auth/jwt".to_string()),
            override_file: Some(PathBuf::from("absent.env")),
            base_dir: dir.path().to_path_buf(),
        };
        let err = select_secret(&mut ScriptedPrompter::default(), &connector(), &options, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingOverrideFile { .. }));
    }

    #[tokio::test]
    async fn test_directory_name_is_asked_again() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("configs")).unwrap();
        std::fs::write(dir.path().join("over.env"), "A=1\n").unwrap();

        let mut prompter = ScriptedPrompter::new([
            choose("uk"),
            choose("auth/jwt"),
            Answer::Text("configs".to_string()),
            Answer::Text("over.env".to_string()),
        ]);
        let options = SelectionOptions {
            base_dir: dir.path().to_path_buf(),
            ..Default::default()
        };

        let session = select_secret(&mut prompter, &connector(), &options, true)
            .await
            .unwrap();
        assert_eq!(
            session.selection.override_file,
            Some(dir.path().join("over.env"))
        );
        assert_eq!(prompter.remaining(), 0);
    }

    #[tokio::test]
    async fn test_preselected_directory_is_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("configs")).unwrap();
        let options = SelectionOptions {
            region: Some(Region::Uk),
            secret_id: Some("auth/jwt".to_string()),
            override_file: Some(PathBuf::from("configs")),
            base_dir: dir.path().to_path_buf(),
        };
        let err = select_secret(&mut ScriptedPrompter::default(), &connector(), &options, true)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingOverrideFile { path } if path.ends_with("configs")));
    }
}
