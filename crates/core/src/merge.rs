//! Right-biased merge of override values over a remote secret.

use crate::secret::SecretValue;
use serde::Serialize;

/// Merge `overrides` over `remote`.
///
/// Keys keep their remote position; keys only present in `overrides` are
/// appended in override order. On collision the override value wins.
#[must_use]
pub fn merge(remote: &SecretValue, overrides: &SecretValue) -> SecretValue {
    let mut merged = remote.clone();
    for (key, value) in overrides.iter() {
        merged.insert(key, value.clone());
    }
    merged
}

/// Key-level description of what a merge changes. Holds no values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    /// Override keys absent from the remote secret.
    pub added: Vec<String>,
    /// Override keys whose value differs from the remote secret.
    pub changed: Vec<String>,
    /// Override keys whose value matches the remote secret.
    pub unchanged: Vec<String>,
}

impl MergeSummary {
    /// Compare `overrides` against `remote`, in override order.
    #[must_use]
    pub fn between(remote: &SecretValue, overrides: &SecretValue) -> Self {
        let mut summary = Self::default();
        for (key, value) in overrides.iter() {
            let bucket = match remote.get(key) {
                None => &mut summary.added,
                Some(existing) if existing == value => &mut summary.unchanged,
                Some(_) => &mut summary.changed,
            };
            bucket.push(key.to_string());
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(pairs: &[(&str, &str)]) -> SecretValue {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_override_wins_and_order_is_kept() {
        let remote = doc(&[("HOST", "db.internal"), ("PORT", "5432")]);
        let overrides = doc(&[("NEW_FLAG", "on"), ("PORT", "6432")]);

        let merged = merge(&remote, &overrides);
        assert_eq!(
            merged.keys().collect::<Vec<_>>(),
            vec!["HOST", "PORT", "NEW_FLAG"]
        );
        assert_eq!(merged.get("PORT"), Some(&json!("6432")));
        assert_eq!(merged.get("HOST"), Some(&json!("db.internal")));
    }

    #[test]
    fn test_merge_with_empty_overrides_is_identity() {
        let remote = doc(&[("A", "1")]);
        assert_eq!(merge(&remote, &SecretValue::new()), remote);
    }

    #[test]
    fn test_override_replaces_non_string_value() {
        let remote = SecretValue::from_json("app", r#"{"PORT":5432}"#).unwrap();
        let merged = merge(&remote, &doc(&[("PORT", "6432")]));
        assert_eq!(merged.get("PORT"), Some(&json!("6432")));
    }

    #[test]
    fn test_summary_buckets() {
        let remote = doc(&[("A", "1"), ("B", "2")]);
        let overrides = doc(&[("B", "2"), ("A", "9"), ("C", "3")]);

        let summary = MergeSummary::between(&remote, &overrides);
        assert_eq!(summary.added, vec!["C"]);
        assert_eq!(summary.changed, vec!["A"]);
        assert_eq!(summary.unchanged, vec!["B"]);
    }

    #[test]
    fn test_summary_without_changes() {
        let remote = doc(&[("A", "1")]);
        let summary = MergeSummary::between(&remote, &doc(&[("A", "1")]));
        assert!(summary.added.is_empty() && summary.changed.is_empty());
        assert_eq!(summary.unchanged, vec!["A"]);
    }
}
