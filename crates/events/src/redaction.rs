//! Process-wide redaction of secret values.
//!
//! Every value read from a secret or an override file is registered here
//! before any event mentions it. Renderers pass all text through [`redact`].

use std::collections::BTreeSet;
use std::sync::{LazyLock, RwLock};

/// Values shorter than this are not redacted (too many false positives).
pub const MIN_SECRET_LENGTH: usize = 4;

/// Replacement text for redacted values.
pub const REDACTED_PLACEHOLDER: &str = "[redacted]";

static REGISTRY: LazyLock<RwLock<BTreeSet<String>>> =
    LazyLock::new(|| RwLock::new(BTreeSet::new()));

/// Register a single value for redaction.
pub fn register_secret(secret: impl Into<String>) {
    register_secrets([secret]);
}

/// Register several values for redaction.
pub fn register_secrets(secrets: impl IntoIterator<Item = impl Into<String>>) {
    let Ok(mut registry) = REGISTRY.write() else {
        return;
    };
    registry.extend(
        secrets
            .into_iter()
            .map(Into::into)
            .filter(|s: &String| s.len() >= MIN_SECRET_LENGTH),
    );
}

/// Replace every registered value in `input` with [`REDACTED_PLACEHOLDER`].
///
/// Longer values are replaced first so a value containing another registered
/// value is hidden as a whole.
#[must_use]
pub fn redact(input: &str) -> String {
    let Ok(registry) = REGISTRY.read() else {
        return input.to_string();
    };
    if registry.is_empty() {
        return input.to_string();
    }

    let mut ordered: Vec<&String> = registry.iter().collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.len()));

    ordered
        .into_iter()
        .fold(input.to_string(), |acc, secret| {
            acc.replace(secret.as_str(), REDACTED_PLACEHOLDER)
        })
}

/// Number of registered values.
#[must_use]
pub fn registered_count() -> usize {
    REGISTRY.read().map(|r| r.len()).unwrap_or(0)
}

#[cfg(test)]
pub(crate) fn clear() {
    if let Ok(mut registry) = REGISTRY.write() {
        registry.clear();
    }
}

#[cfg(test)]
pub(crate) static TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
