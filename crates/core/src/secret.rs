//! The flat key/value document stored in a secret.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A flat secret document: keys in insertion order mapped to JSON values.
///
/// Remote secrets may carry non-string values; override files only ever
/// produce strings. `Debug` prints key names only.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecretValue(IndexMap<String, Value>);

impl SecretValue {
    /// Create an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a secret string that must hold a JSON object.
    ///
    /// The error never quotes the body, only its JSON kind or the parser
    /// position.
    ///
    /// # Errors
    /// Returns [`Error::InvalidSecretJson`] for malformed JSON or a non-object body.
    pub fn from_json(secret_id: &str, body: &str) -> Result<Self> {
        let invalid = |message: String| Error::InvalidSecretJson {
            secret_id: secret_id.to_string(),
            message,
        };

        // Decode straight into the ordered map so key order survives
        match serde_json::from_str::<IndexMap<String, Value>>(body) {
            Ok(map) => Ok(Self(map)),
            Err(e) => match serde_json::from_str::<Value>(body) {
                Ok(other) if !other.is_object() => Err(invalid(format!(
                    "expected an object, found {}",
                    kind(&other)
                ))),
                _ => Err(invalid(format!(
                    "parse error at line {} column {}",
                    e.line(),
                    e.column()
                ))),
            },
        }
    }

    /// Indented JSON (2 spaces), the format of the review file.
    ///
    /// # Errors
    /// Returns a serialization error if encoding fails.
    pub fn to_pretty_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.0)?)
    }

    /// Compact JSON, the format pushed to the store.
    ///
    /// # Errors
    /// Returns a serialization error if encoding fails.
    pub fn to_compact_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.0)?)
    }

    /// Insert or replace a key, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the document has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every value rendered as text, for the redaction registry.
    #[must_use]
    pub fn value_texts(&self) -> Vec<String> {
        self.0
            .values()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for SecretValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretValue")
            .field("keys", &self.0.keys().collect::<Vec<_>>())
            .finish()
    }
}
