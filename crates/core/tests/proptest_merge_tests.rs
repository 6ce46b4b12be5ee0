//! Property-based tests for the merge and the override parser.
//!
//! These tests verify the behavioral contracts of a merge session:
//! - Right bias: an override key always carries the override value
//! - Preservation: a key only present remotely keeps the remote value
//! - Parsing: rendered `key=value` lines parse back to the same pairs

use proptest::prelude::*;
use secmerge_core::{MergeSummary, SecretValue, merge, parse_overrides};
use std::collections::BTreeMap;

// =============================================================================
// Strategies for generating test data
// =============================================================================

/// Generate environment-style key names
fn key_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,12}".prop_map(String::from)
}

/// Generate values that may contain `=` but no line breaks or edge whitespace
fn value_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z0-9]{0,16}".prop_map(String::from),
        "[a-z]{1,5}=[a-z]{1,5}".prop_map(String::from),
        Just("postgres://user:pw@db:5432/app?ssl=true".to_string()),
    ]
}

fn document_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..8)
}

fn to_value(map: &BTreeMap<String, String>) -> SecretValue {
    map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

proptest! {
    #[test]
    fn merge_is_right_biased(remote in document_strategy(), overrides in document_strategy()) {
        let merged = merge(&to_value(&remote), &to_value(&overrides));

        for (key, value) in &overrides {
            prop_assert_eq!(merged.get(key).and_then(|v| v.as_str()), Some(value.as_str()));
        }
        for (key, value) in remote.iter().filter(|(k, _)| !overrides.contains_key(*k)) {
            prop_assert_eq!(merged.get(key).and_then(|v| v.as_str()), Some(value.as_str()));
        }

        let expected_len = remote.keys().chain(overrides.keys()).collect::<std::collections::BTreeSet<_>>().len();
        prop_assert_eq!(merged.len(), expected_len);
    }

    #[test]
    fn merge_keeps_remote_order_first(remote in document_strategy(), overrides in document_strategy()) {
        let merged = merge(&to_value(&remote), &to_value(&overrides));
        let prefix: Vec<&str> = merged.keys().take(remote.len()).collect();
        let remote_keys: Vec<&str> = remote.keys().map(String::as_str).collect();
        prop_assert_eq!(prefix, remote_keys);
    }

    #[test]
    fn summary_partitions_override_keys(remote in document_strategy(), overrides in document_strategy()) {
        let summary = MergeSummary::between(&to_value(&remote), &to_value(&overrides));

        prop_assert_eq!(
            summary.added.len() + summary.changed.len() + summary.unchanged.len(),
            overrides.len()
        );
        for key in &summary.added {
            prop_assert!(!remote.contains_key(key));
        }
        for key in &summary.unchanged {
            prop_assert_eq!(remote.get(key), overrides.get(key));
        }
    }

    #[test]
    fn rendered_lines_parse_back(doc in document_strategy(), comment in "# [a-z ]{0,10}") {
        let mut content = String::new();
        for (key, value) in &doc {
            content.push_str(&format!("  {key}={value}\n\n{comment}\n"));
        }
        prop_assert_eq!(parse_overrides(&content), to_value(&doc));
    }
}
