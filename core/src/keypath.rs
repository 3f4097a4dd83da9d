//! Dotted key paths into JSON documents.
//!
//! `"data.user"` means "the `user` field of the `data` field". When a step
//! lands on an array the remaining key is applied to every element and the
//! results are gathered into a new array, so `"data.users.name"` yields the
//! list of names. An object element that lacks the key contributes `null`.

use std::fmt;

use serde_json::Value;

/// A parsed dotted path. Every segment, including an empty one, is a literal
/// object key, so `""` looks up the key `""`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    raw: String,
    segments: Vec<String>,
}

impl KeyPath {
    pub fn new(raw: &str) -> Self {
        let segments = raw.split('.').map(str::to_string).collect();
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Resolve the path against `root`, returning the addressed fragment.
    pub fn resolve(&self, root: &Value) -> Option<Value> {
        let mut current = root.clone();
        for key in &self.segments {
            current = lookup(&current, key)?;
        }
        Some(current)
    }
}

impl From<&str> for KeyPath {
    fn from(raw: &str) -> Self {
        KeyPath::new(raw)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn lookup(value: &Value, key: &str) -> Option<Value> {
    match value {
        Value::Object(map) => map.get(key).cloned(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => Some(map.get(key).cloned().unwrap_or(Value::Null)),
                Value::Array(_) => lookup(item, key),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .map(Value::Array),
        _ => None,
    }
}
