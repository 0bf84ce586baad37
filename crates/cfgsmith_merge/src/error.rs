//! Error types for merge operations.

use serde_yaml::Value;
use thiserror::Error;

/// Result type alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that abort a merge.
///
/// Only malformed `__append` directives are errors; every other directive
/// that does not apply is a silent no-op.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    #[error("Invalid append directive '{key}': only lists can be appended, not {found}")]
    AppendValueNotSequence { key: String, found: &'static str },

    #[error("Invalid append directive '{key}': can append to lists only, not {found}")]
    AppendTargetNotSequence { key: String, found: &'static str },
}

impl MergeError {
    /// Dotted path of the offending directive key.
    pub fn key(&self) -> &str {
        match self {
            Self::AppendValueNotSequence { key, .. } | Self::AppendTargetNotSequence { key, .. } => {
                key
            }
        }
    }

    /// Prefix the directive key with the mapping key it was found under.
    pub(crate) fn within(self, parent: &Value) -> Self {
        let parent = display_key(parent);
        match self {
            Self::AppendValueNotSequence { key, found } => Self::AppendValueNotSequence {
                key: format!("{}.{}", parent, key),
                found,
            },
            Self::AppendTargetNotSequence { key, found } => Self::AppendTargetNotSequence {
                key: format!("{}.{}", parent, key),
                found,
            },
        }
    }
}

/// Human-readable name of a value's shape.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Render a mapping key the way it would appear in a dotted path.
pub(crate) fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => format!("<{}>", kind_name(other)),
    }
}
