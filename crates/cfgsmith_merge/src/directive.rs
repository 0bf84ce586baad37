//! Merge directives embedded in overriding mappings.
//!
//! An overriding mapping may carry keys that are instructions rather than
//! values:
//!
//! - `key: false` removes `key` from the base
//! - `key__remove: true` removes `key` from the base
//! - `key__remove: [items]` removes matching items from the base list at `key`
//! - `key__append: [items]` appends items to the base list at `key`
//! - `__delete_keys__: ["a.b.c"]` deletes nested keys by dotted path
//!
//! Keys are parsed into a `(base name, DirectiveKind)` pair once, so the merge
//! loop never matches suffixes ad hoc.

use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{display_key, kind_name, MergeError, MergeResult};

/// Key holding the list of dotted paths to delete.
pub const DELETE_KEYS: &str = "__delete_keys__";

/// Suffix marking a removal directive.
pub const REMOVE_SUFFIX: &str = "__remove";

/// Suffix marking an append directive.
pub const APPEND_SUFFIX: &str = "__append";

/// What a mapping key asks the merge to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    /// Plain key, merged or replaced as a value.
    None,
    /// `<base>__remove`
    Remove,
    /// `<base>__append`
    Append,
}

impl DirectiveKind {
    /// Split a key into its base name and directive kind.
    pub fn parse(key: &str) -> (&str, DirectiveKind) {
        if let Some(base) = key.strip_suffix(REMOVE_SUFFIX) {
            (base, DirectiveKind::Remove)
        } else if let Some(base) = key.strip_suffix(APPEND_SUFFIX) {
            (base, DirectiveKind::Append)
        } else {
            (key, DirectiveKind::None)
        }
    }

    /// Parse a mapping key. Non-string keys are always plain.
    pub fn of_key(key: &Value) -> (Option<&str>, DirectiveKind) {
        match key.as_str() {
            Some(s) => {
                let (base, kind) = Self::parse(s);
                (Some(base), kind)
            }
            None => (None, DirectiveKind::None),
        }
    }
}

/// Whether a key is the `__delete_keys__` directive.
pub fn is_delete_keys(key: &Value) -> bool {
    key.as_str() == Some(DELETE_KEYS)
}

/// Whether a key/value pair of an overriding mapping is consumed by a directive
/// and must not be merged as a plain value.
pub fn is_directive_entry(key: &Value, value: &Value) -> bool {
    if is_delete_keys(key) || matches!(value, Value::Bool(false)) {
        return true;
    }
    !matches!(DirectiveKind::of_key(key).1, DirectiveKind::None)
}

/// Apply the removal directives of `overrides` to `base` in place.
///
/// Runs deep-key deletion, then `__remove` keys, then `false` removals.
/// Directives pointing at missing keys are no-ops.
pub fn apply_directives(base: &mut Mapping, overrides: &Mapping) {
    delete_dotted_keys(base, overrides.get(DELETE_KEYS));
    apply_removals(base, overrides);
    remove_false_values(base, overrides);
}

/// Delete every dotted path listed under `__delete_keys__`.
fn delete_dotted_keys(base: &mut Mapping, paths: Option<&Value>) {
    let paths = match paths {
        None | Some(Value::Null) => return,
        Some(Value::Sequence(paths)) => paths,
        Some(other) => {
            warn!(
                "Ignoring {}: expected a list of dotted paths, got {}",
                DELETE_KEYS,
                kind_name(other)
            );
            return;
        }
    };

    for path in paths {
        match path.as_str() {
            Some(dotted) => {
                if delete_dotted_key(base, dotted) {
                    debug!("Deleted key '{}'", dotted);
                }
            }
            None => debug!("Skipping non-string entry in {}", DELETE_KEYS),
        }
    }
}

/// Delete one dotted path. Returns `true` when a key was removed.
///
/// Keys may contain dots themselves (`10.1.1.1`), so at each level the
/// shortest run of segments naming an existing key wins, falling back to
/// longer runs. The path is abandoned once a matched key is not a mapping.
pub fn delete_dotted_key(base: &mut Mapping, dotted: &str) -> bool {
    let segments: Vec<&str> = dotted.split('.').collect();
    delete_path(base, &segments)
}

fn delete_path(mapping: &mut Mapping, segments: &[&str]) -> bool {
    for take in 1..=segments.len() {
        let Some(key) = find_key(mapping, &segments[..take].join(".")) else {
            continue;
        };
        if take == segments.len() {
            return mapping.shift_remove(&key).is_some();
        }
        match mapping.get_mut(&key) {
            Some(Value::Mapping(next)) => {
                if delete_path(next, &segments[take..]) {
                    return true;
                }
            }
            _ => return false,
        }
    }
    false
}

/// Find the key a dotted-path segment refers to.
///
/// Numeric and boolean keys match their YAML spelling, so `vlans.10` reaches
/// an integer key `10`.
fn find_key(mapping: &Mapping, segment: &str) -> Option<Value> {
    let exact = Value::String(segment.to_string());
    if mapping.contains_key(&exact) {
        return Some(exact);
    }
    mapping
        .keys()
        .find(|key| matches!(key, Value::Number(_) | Value::Bool(_)) && display_key(key) == segment)
        .cloned()
}

/// Handle `<key>__remove` directives.
fn apply_removals(base: &mut Mapping, overrides: &Mapping) {
    for (key, value) in overrides {
        let (Some(name), DirectiveKind::Remove) = DirectiveKind::of_key(key) else {
            continue;
        };

        match value {
            Value::Bool(true) => {
                if base.shift_remove(name).is_some() {
                    debug!("Removed key '{}'", name);
                }
            }
            Value::Sequence(items) => {
                if let Some(Value::Sequence(list)) = base.get_mut(name) {
                    let before = list.len();
                    list.retain(|item| !items.contains(item));
                    debug!("Removed {} item(s) from '{}'", before - list.len(), name);
                }
            }
            _ => {}
        }
    }
}

/// Remove every key whose overriding value is exactly `false`.
fn remove_false_values(base: &mut Mapping, overrides: &Mapping) {
    for (key, value) in overrides {
        if matches!(value, Value::Bool(false)) && base.shift_remove(key).is_some() {
            debug!("Removed key '{}' (set to false)", display_key(key));
        }
    }
}

/// Handle `<key>__append` directives.
///
/// The directive value must be a list, and an existing base value must be a
/// list too. Missing base keys are created. Duplicates are kept.
pub fn apply_appends(base: &mut Mapping, overrides: &Mapping) -> MergeResult<()> {
    for (key, value) in overrides {
        let (Some(name), DirectiveKind::Append) = DirectiveKind::of_key(key) else {
            continue;
        };
        let directive = display_key(key);

        let Value::Sequence(items) = value else {
            return Err(MergeError::AppendValueNotSequence {
                key: directive,
                found: kind_name(value),
            });
        };

        match base.get_mut(name) {
            None => {
                base.insert(Value::from(name), Value::Sequence(items.clone()));
            }
            Some(Value::Sequence(list)) => list.extend(items.iter().cloned()),
            Some(other) => {
                return Err(MergeError::AppendTargetNotSequence {
                    key: directive,
                    found: kind_name(other),
                });
            }
        }
        debug!("Appended {} item(s) to '{}'", items.len(), name);
    }
    Ok(())
}
