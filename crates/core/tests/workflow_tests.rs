//! End-to-end workflow tests against the in-memory store.

use secmerge_core::{
    Answer, Error, InMemoryConnector, InMemoryStore, REVIEW_FILE_NAME, Region, RollbackOutcome,
    ScriptedPrompter, SecretValue, SelectionOptions, UpdateOutcome, VersionStage,
    rollback_secret, update_secret,
};
use secmerge_core::workflow::CONFIRM_PROMPT;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

const REMOTE: &str = r#"{"DB_HOST":"db.internal","DB_PASSWORD":"hunter22","PORT":5432}"#;

fn store() -> Arc<InMemoryStore> {
    Arc::new(
        InMemoryStore::new(Region::Ca)
            .with_secret("billing/prod", REMOTE)
            .with_secret("auth/prod", "{}"),
    )
}

fn options(base_dir: &Path) -> SelectionOptions {
    SelectionOptions {
        base_dir: base_dir.to_path_buf(),
        ..Default::default()
    }
}

fn interactive_update(confirm: Answer) -> ScriptedPrompter {
    ScriptedPrompter::new([
        Answer::Choose("ca".to_string()),
        Answer::Choose("billing/prod".to_string()),
        Answer::Text("overrides.env".to_string()),
        confirm,
    ])
}

fn write_overrides(dir: &Path) {
    std::fs::write(
        dir.join("overrides.env"),
        "# rotate the password\nDB_PASSWORD=s3cr3t=new\nFEATURE_X=on\n",
    )
    .unwrap();
}

#[tokio::test]
async fn declining_leaves_remote_untouched() {
    let dir = tempfile::tempdir().unwrap();
    write_overrides(dir.path());
    let store = store();
    let connector = InMemoryConnector::new().with_store(Arc::clone(&store));

    let mut prompter = interactive_update(Answer::Confirm(false));
    let outcome = update_secret(&mut prompter, &connector, &options(dir.path()))
        .await
        .unwrap();

    let UpdateOutcome::Cancelled { selection, summary } = outcome else {
        panic!("expected cancellation, got {outcome:?}");
    };
    assert_eq!(selection.secret_id, "billing/prod");
    assert_eq!(summary.added, vec!["FEATURE_X"]);
    assert_eq!(summary.changed, vec!["DB_PASSWORD"]);

    assert_eq!(store.write_count(), 0);
    assert_eq!(store.current_string("billing/prod").unwrap(), REMOTE);
    // The review file is still written
    assert!(dir.path().join(REVIEW_FILE_NAME).exists());
}

#[tokio::test]
async fn accepting_stores_exactly_the_merged_secret() {
    let dir = tempfile::tempdir().unwrap();
    write_overrides(dir.path());
    let store = store();
    let connector = InMemoryConnector::new().with_store(Arc::clone(&store));

    let mut prompter = interactive_update(Answer::Confirm(true));
    let outcome = update_secret(&mut prompter, &connector, &options(dir.path()))
        .await
        .unwrap();

    let UpdateOutcome::Committed { version_id, .. } = outcome else {
        panic!("expected commit, got {outcome:?}");
    };
    assert_eq!(
        store.stage_version("billing/prod", VersionStage::Current),
        Some(version_id)
    );

    let stored: serde_json::Value =
        serde_json::from_str(&store.current_string("billing/prod").unwrap()).unwrap();
    assert_eq!(
        stored,
        json!({
            "DB_HOST": "db.internal",
            "DB_PASSWORD": "s3cr3t=new",
            "PORT": 5432,
            "FEATURE_X": "on"
        })
    );
    assert_eq!(prompter.asked().last().map(String::as_str), Some(CONFIRM_PROMPT));
}

#[tokio::test]
async fn review_file_holds_the_indented_merge() {
    let dir = tempfile::tempdir().unwrap();
    write_overrides(dir.path());
    let connector = InMemoryConnector::new().with_store(store());

    update_secret(
        &mut interactive_update(Answer::Default),
        &connector,
        &options(dir.path()),
    )
    .await
    .unwrap();

    let written = std::fs::read_to_string(dir.path().join(REVIEW_FILE_NAME)).unwrap();
    let merged = SecretValue::from_json("billing/prod", &written).unwrap();
    assert_eq!(written, merged.to_pretty_json().unwrap());
    assert_eq!(
        merged.keys().collect::<Vec<_>>(),
        vec!["DB_HOST", "DB_PASSWORD", "PORT", "FEATURE_X"]
    );
    assert!(written.starts_with("{\n  \"DB_HOST\": \"db.internal\","));
}

#[tokio::test]
async fn missing_file_is_asked_again() {
    let dir = tempfile::tempdir().unwrap();
    write_overrides(dir.path());
    let connector = InMemoryConnector::new().with_store(store());

    let mut prompter = ScriptedPrompter::new([
        Answer::Choose("ca".to_string()),
        Answer::Choose("auth/prod".to_string()),
        Answer::Text("typo.env".to_string()),
        Answer::Text("overrides.env".to_string()),
        Answer::Confirm(false),
    ]);
    update_secret(&mut prompter, &connector, &options(dir.path()))
        .await
        .unwrap();
    assert_eq!(prompter.remaining(), 0);
}

#[tokio::test]
async fn empty_region_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let connector = InMemoryConnector::new().with_store(store());

    let mut prompter = ScriptedPrompter::new([Answer::Choose("uk".to_string())]);
    let err = update_secret(&mut prompter, &connector, &options(dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoSecrets { ref region } if region == "eu-west-2"));
}

#[tokio::test]
async fn rollback_restores_previous_version() {
    let dir = tempfile::tempdir().unwrap();
    write_overrides(dir.path());
    let store = store();
    let connector = InMemoryConnector::new().with_store(Arc::clone(&store));
    let original = store
        .stage_version("billing/prod", VersionStage::Current)
        .unwrap();

    update_secret(
        &mut interactive_update(Answer::Confirm(true)),
        &connector,
        &options(dir.path()),
    )
    .await
    .unwrap();
    let updated = store
        .stage_version("billing/prod", VersionStage::Current)
        .unwrap();

    let mut prompter = ScriptedPrompter::new([
        Answer::Choose("ca".to_string()),
        Answer::Choose("billing/prod".to_string()),
    ]);
    let RollbackOutcome {
        version_id,
        replaced,
        ..
    } = rollback_secret(&mut prompter, &connector, &options(dir.path()))
        .await
        .unwrap();

    assert_eq!(version_id, original);
    assert_eq!(replaced, updated);
    assert_eq!(
        store.stage_version("billing/prod", VersionStage::Current),
        Some(original)
    );
    assert_eq!(store.current_string("billing/prod").unwrap(), REMOTE);
    // No file prompt and no confirmation on rollback
    assert_eq!(prompter.asked(), ["Select Region", "Select Secret"]);
}
