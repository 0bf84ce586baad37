//! Deep merge of variable mappings.

use serde_yaml::{Mapping, Value};

use crate::directive::{
    apply_appends, apply_directives, is_delete_keys, is_directive_entry, DirectiveKind,
};
use crate::error::MergeResult;

/// Merge `overrides` on top of `base`, returning a new value.
///
/// Two mappings are merged key by key. Any other combination is a complete
/// replacement by `overrides`.
pub fn merge_values(base: &Value, overrides: &Value) -> MergeResult<Value> {
    match (base, overrides) {
        (Value::Mapping(base), Value::Mapping(overrides)) => {
            merge_mappings(base, overrides).map(Value::Mapping)
        }
        (_, overrides) => normalize(overrides),
    }
}

/// Merge two mappings into a new mapping.
///
/// 1. removal directives of `overrides` are applied to a copy of `base`
/// 2. `__append` directives extend lists (errors abort the merge)
/// 3. plain keys recurse into nested mappings and replace everything else,
///    lists included
pub fn merge_mappings(base: &Mapping, overrides: &Mapping) -> MergeResult<Mapping> {
    let mut result = base.clone();

    apply_directives(&mut result, overrides);
    apply_appends(&mut result, overrides)?;

    for (key, value) in overrides {
        if is_directive_entry(key, value) {
            continue;
        }

        let merged = match (result.get(key), value) {
            (Some(Value::Mapping(existing)), Value::Mapping(nested)) => {
                Value::Mapping(merge_mappings(existing, nested).map_err(|e| e.within(key))?)
            }
            _ => normalize(value).map_err(|e| e.within(key))?,
        };
        result.insert(key.clone(), merged);
    }

    Ok(result)
}

/// Fold mappings from most general to most specific, starting from empty.
pub fn merge_all<'a, I>(sources: I) -> MergeResult<Mapping>
where
    I: IntoIterator<Item = &'a Mapping>,
{
    sources
        .into_iter()
        .try_fold(Mapping::new(), |acc, source| merge_mappings(&acc, source))
}

/// Copy a value that lands without a mapping to merge into.
///
/// Directive keys are resolved against nothing at every depth: `__append`
/// becomes the appended list, `__remove` and `__delete_keys__` are dropped.
/// Everything else, `false` values included, is kept as is.
fn normalize(value: &Value) -> MergeResult<Value> {
    let Value::Mapping(mapping) = value else {
        return Ok(value.clone());
    };

    let mut result = Mapping::new();
    apply_appends(&mut result, mapping)?;

    for (key, value) in mapping {
        if is_delete_keys(key) || DirectiveKind::of_key(key).1 != DirectiveKind::None {
            continue;
        }
        let normalized = normalize(value).map_err(|e| e.within(key))?;
        result.insert(key.clone(), normalized);
    }

    Ok(Value::Mapping(result))
}
