//! Target classification: `target_type` and the filename-derived variable.

use std::path::Path;

use cfgsmith_merge::VariableMapping;
use serde_yaml::{Mapping, Value};

use crate::hierarchy::path_segments;

/// Key always injected into merged variables.
pub const TARGET_TYPE_KEY: &str = "target_type";

/// What classification added to a target's variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub target_type: String,
    /// Dotted variable and the file stem assigned to it, when it was missing.
    pub filename_variable: Option<(String, String)>,
}

impl Classification {
    /// Template the target is rendered with.
    pub fn template_name(&self) -> String {
        format!("{}/base", self.target_type)
    }
}

/// Target type of a relative target path: its first directory name.
///
/// Targets sitting directly in the input root have an empty type.
pub fn target_type(relative_path: &Path) -> String {
    path_segments(relative_path)
        .into_iter()
        .next()
        .unwrap_or_default()
}

/// Set a dotted variable unless it already exists.
///
/// Intermediate mappings are created as needed. A non-mapping value on the way
/// blocks the assignment; nothing is overwritten. Returns `true` when the
/// value was set.
pub fn set_if_missing(vars: &mut Mapping, path: &[&str], value: Value) -> bool {
    let Some((first, rest)) = path.split_first() else {
        return false;
    };
    let key = Value::from(*first);

    if rest.is_empty() {
        if vars.contains_key(&key) {
            return false;
        }
        vars.insert(key, value);
        return true;
    }

    if !vars.contains_key(&key) {
        vars.insert(key.clone(), Value::Mapping(Mapping::new()));
    }
    match vars.get_mut(&key) {
        Some(Value::Mapping(nested)) => set_if_missing(nested, rest, value),
        _ => false,
    }
}

/// Inject `target_type` and the optional filename-derived variable.
///
/// `target_type` always overwrites an existing value. The filename variable
/// (e.g. `hostname` or `device.name`) only fills a gap.
pub fn classify(
    relative_path: &Path,
    vars: &mut VariableMapping,
    filename_variable: Option<&str>,
) -> Classification {
    let target_type = target_type(relative_path);
    vars.insert(
        Value::from(TARGET_TYPE_KEY),
        Value::from(target_type.as_str()),
    );

    let filename_variable = filename_variable.and_then(|variable| {
        let stem = relative_path.file_stem()?.to_string_lossy().into_owned();
        let path: Vec<&str> = variable.split('.').collect();
        set_if_missing(vars, &path, Value::from(stem.as_str()))
            .then(|| (variable.to_string(), stem))
    });

    Classification {
        target_type,
        filename_variable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_target_type() {
        assert_eq!(target_type(Path::new("cisco_ios/router/ny.yaml")), "cisco_ios");
        assert_eq!(target_type(Path::new("juniper/r1.yaml")), "juniper");
        assert_eq!(target_type(Path::new("r1.yaml")), "");
    }

    #[test]
    fn test_target_type_overwrites() {
        let mut vars = yaml("target_type: custom\nhostname: r1");
        let classification = classify(Path::new("ios/r1.yaml"), &mut vars, None);
        assert_eq!(classification.target_type, "ios");
        assert_eq!(classification.template_name(), "ios/base");
        assert_eq!(vars, yaml("target_type: ios\nhostname: r1"));
    }

    #[test]
    fn test_filename_variable_set_when_missing() {
        let mut vars = Mapping::new();
        let classification = classify(Path::new("ios/GW01.yaml"), &mut vars, Some("hostname"));
        assert_eq!(
            classification.filename_variable,
            Some(("hostname".to_string(), "GW01".to_string()))
        );
        assert_eq!(vars, yaml("target_type: ios\nhostname: GW01"));
    }

    #[test]
    fn test_filename_variable_nested() {
        let mut vars = yaml("person: {age: 30}");
        classify(Path::new("people/Alex.yaml"), &mut vars, Some("person.name"));
        assert_eq!(
            vars,
            yaml("person: {age: 30, name: Alex}\ntarget_type: people")
        );
    }

    #[test]
    fn test_filename_variable_not_overwritten() {
        let mut vars = yaml("hostname: core-01");
        let classification = classify(Path::new("ios/r1.yaml"), &mut vars, Some("hostname"));
        assert_eq!(classification.filename_variable, None);
        assert_eq!(vars.get("hostname"), Some(&Value::from("core-01")));
    }

    #[test]
    fn test_filename_variable_blocked_by_scalar() {
        let mut vars = yaml("person: Alex");
        assert!(!set_if_missing(&mut vars, &["person", "name"], Value::from("x")));
        assert_eq!(vars, yaml("person: Alex"));
    }

    #[test]
    fn test_set_if_missing_creates_intermediates() {
        let mut vars = Mapping::new();
        assert!(set_if_missing(&mut vars, &["a", "b", "c"], Value::from(1)));
        assert_eq!(vars, yaml("a: {b: {c: 1}}"));
        assert!(!set_if_missing(&mut vars, &[], Value::from(1)));
    }
}
