//! Hierarchical variable resolution.
//!
//! For a target at `cisco_ios/router/new_york.yaml` the sources are, from most
//! general to most specific:
//!
//! ```text
//! <input>/vars.yaml
//! <input>/cisco_ios/vars.yaml
//! <input>/cisco_ios/router/vars.yaml
//! <input>/cisco_ios/router/new_york.yaml
//! ```
//!
//! Missing sources are skipped; the rest are folded through the merge engine.

use std::fs;
use std::path::{Component, Path, PathBuf};

use cfgsmith_merge::{kind_name, merge_mappings, VariableMapping};
use serde_yaml::Value;
use tracing::{debug, enabled, Level};

use crate::error::{CoreError, CoreResult};
use crate::headers::HeaderLines;

/// Directory names of a relative target path, file name excluded.
pub fn path_segments(relative_path: &Path) -> Vec<String> {
    relative_path
        .parent()
        .map(|dir| {
            dir.components()
                .filter_map(|c| match c {
                    Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Resolves the merged variables of targets below an input root.
#[derive(Debug, Clone)]
pub struct HierarchyResolver {
    input_root: PathBuf,
    vars_filename: String,
    headers: HeaderLines,
}

impl HierarchyResolver {
    /// Create a resolver for targets below `input_root`.
    pub fn new(input_root: impl Into<PathBuf>, vars_filename: impl Into<String>) -> Self {
        Self {
            input_root: input_root.into(),
            vars_filename: vars_filename.into(),
            headers: HeaderLines::default(),
        }
    }

    /// Use custom header lines for debug output.
    pub fn with_headers(mut self, headers: HeaderLines) -> Self {
        self.headers = headers;
        self
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    /// Candidate sources for a target, most general first.
    ///
    /// One variables file per directory level from the root down to the
    /// target's own directory, then the target itself.
    pub fn candidates(&self, relative_path: &Path) -> Vec<PathBuf> {
        let segments = path_segments(relative_path);
        let mut candidates = Vec::with_capacity(segments.len() + 2);

        let mut dir = self.input_root.clone();
        candidates.push(dir.join(&self.vars_filename));
        for segment in &segments {
            dir.push(segment);
            candidates.push(dir.join(&self.vars_filename));
        }
        candidates.push(self.input_root.join(relative_path));
        candidates
    }

    /// Merge all existing sources of a target.
    ///
    /// Fails on the first unreadable, unparsable or non-mapping source and on
    /// malformed merge directives; the caller decides what to do with the
    /// target.
    pub fn resolve(&self, relative_path: &Path) -> CoreResult<VariableMapping> {
        let target = self.input_root.join(relative_path);
        debug!("{}", self.headers.header(1, &target.display().to_string()));

        let mut merged = VariableMapping::new();
        for path in self.candidates(relative_path) {
            if !path.exists() {
                continue;
            }

            let data = load_mapping(&path)?;
            debug!("{}", self.headers.header(2, &path.display().to_string()));
            self.dump("old data", &merged);
            self.dump("new data", &data);

            merged = merge_mappings(&merged, &data).map_err(|source| CoreError::Merge {
                path: path.clone(),
                source,
            })?;
            self.dump("merged data", &merged);
        }

        Ok(merged)
    }

    fn dump(&self, title: &str, mapping: &VariableMapping) {
        if !enabled!(Level::DEBUG) {
            return;
        }
        debug!("{}", self.headers.header(3, title));
        match serde_yaml::to_string(mapping) {
            Ok(text) => debug!("{}", text.trim_end()),
            Err(e) => debug!("<unprintable: {}>", e),
        }
    }
}

/// Load one variables source. Empty and comment-only files are empty
/// mappings.
pub fn load_mapping(path: &Path) -> CoreResult<VariableMapping> {
    let content = fs::read_to_string(path).map_err(|source| CoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(VariableMapping::new());
    }

    let value: Value = serde_yaml::from_str(&content).map_err(|source| CoreError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(VariableMapping::new()),
        other => Err(CoreError::NotAMapping {
            path: path.to_path_buf(),
            found: kind_name(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn yaml(text: &str) -> VariableMapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_path_segments() {
        assert_eq!(
            path_segments(Path::new("cisco_ios/router/ny.yaml")),
            vec!["cisco_ios", "router"]
        );
        assert!(path_segments(Path::new("ny.yaml")).is_empty());
        assert_eq!(path_segments(Path::new("./ios/r1.yaml")), vec!["ios"]);
    }

    #[test]
    fn test_candidates_order() {
        let resolver = HierarchyResolver::new("/in", "vars.yaml");
        assert_eq!(
            resolver.candidates(Path::new("ios/core/r1.yaml")),
            vec![
                PathBuf::from("/in/vars.yaml"),
                PathBuf::from("/in/ios/vars.yaml"),
                PathBuf::from("/in/ios/core/vars.yaml"),
                PathBuf::from("/in/ios/core/r1.yaml"),
            ]
        );
    }

    #[test]
    fn test_candidates_root_level_target() {
        let resolver = HierarchyResolver::new("/in", "vars.yaml");
        assert_eq!(
            resolver.candidates(Path::new("r1.yaml")),
            vec![PathBuf::from("/in/vars.yaml"), PathBuf::from("/in/r1.yaml")]
        );
    }

    #[test]
    fn test_resolve_skips_missing_levels() {
        let temp = tempdir().unwrap();
        write(temp.path(), "vars.yaml", "mtu: 1500\nntp: [a]");
        write(temp.path(), "ios/core/vars.yaml", "ntp__append: [b]");
        write(temp.path(), "ios/core/r1.yaml", "hostname: r1\nmtu: 9000");

        let resolver = HierarchyResolver::new(temp.path(), "vars.yaml");
        let merged = resolver.resolve(Path::new("ios/core/r1.yaml")).unwrap();
        assert_eq!(merged, yaml("mtu: 9000\nntp: [a, b]\nhostname: r1"));
    }

    #[test]
    fn test_resolve_empty_files() {
        let temp = tempdir().unwrap();
        write(temp.path(), "vars.yaml", "");
        write(temp.path(), "ios/r1.yaml", "# only a comment\n");

        let resolver = HierarchyResolver::new(temp.path(), "vars.yaml");
        assert!(resolver.resolve(Path::new("ios/r1.yaml")).unwrap().is_empty());
    }

    #[test]
    fn test_resolve_parse_error() {
        let temp = tempdir().unwrap();
        write(temp.path(), "ios/vars.yaml", "key: [unclosed");
        write(temp.path(), "ios/r1.yaml", "hostname: r1");

        let resolver = HierarchyResolver::new(temp.path(), "vars.yaml");
        let err = resolver.resolve(Path::new("ios/r1.yaml")).unwrap_err();
        match err {
            CoreError::Yaml { path, .. } => assert_eq!(path, temp.path().join("ios/vars.yaml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_non_mapping_source() {
        let temp = tempdir().unwrap();
        write(temp.path(), "ios/r1.yaml", "- a\n- b\n");

        let resolver = HierarchyResolver::new(temp.path(), "vars.yaml");
        let err = resolver.resolve(Path::new("ios/r1.yaml")).unwrap_err();
        assert!(matches!(err, CoreError::NotAMapping { found: "sequence", .. }));
    }

    #[test]
    fn test_resolve_append_error() {
        let temp = tempdir().unwrap();
        write(temp.path(), "vars.yaml", "acl: {name: x}");
        write(temp.path(), "ios/r1.yaml", "acl__append: [permit]");

        let resolver = HierarchyResolver::new(temp.path(), "vars.yaml");
        let err = resolver.resolve(Path::new("ios/r1.yaml")).unwrap_err();
        assert!(err.is_merge_error());
        assert!(err.to_string().contains("r1.yaml"));
    }
}
