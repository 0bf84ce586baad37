//! Template loading functionality.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{TemplateError, TemplateResult};
use crate::renderer::{format_tera_error, TemplateRenderer};

/// Default extension of template files.
pub const DEFAULT_TEMPLATE_EXT: &str = ".j2";

/// Template loader.
pub struct TemplateLoader {
    templates_path: PathBuf,
    extension: String,
}

impl TemplateLoader {
    /// Create a new template loader for `*.j2` files.
    pub fn new(templates_path: impl Into<PathBuf>) -> Self {
        Self {
            templates_path: templates_path.into(),
            extension: DEFAULT_TEMPLATE_EXT.to_string(),
        }
    }

    /// Use a different template file extension (e.g. `.tera`).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Load every template under the templates directory.
    pub fn load_all(&self) -> TemplateResult<TemplateRenderer> {
        if !self.templates_path.exists() {
            warn!("Templates directory does not exist: {:?}", self.templates_path);
            return Ok(TemplateRenderer::empty());
        }

        let mut sources = Vec::new();
        for entry in WalkDir::new(&self.templates_path)
            .min_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let Some(name) = self.template_name(path) else {
                continue;
            };

            let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            debug!("Loaded template {} from {:?}", name, path);
            sources.push((name, content));
        }

        let renderer =
            TemplateRenderer::from_sources(sources).map_err(|e| TemplateError::LoadFailed {
                path: self.templates_path.clone(),
                message: format_tera_error(&e),
            })?;

        info!(
            "Loaded {} template(s) from {:?}",
            renderer.template_names().len(),
            self.templates_path
        );
        Ok(renderer)
    }

    /// Template name for a file: relative path with `/` separators and the
    /// template extension stripped. `None` for files with another extension.
    pub fn template_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.templates_path).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        let joined = parts.join("/");

        if self.extension.is_empty() {
            return Some(joined);
        }
        joined
            .strip_suffix(self.extension.as_str())
            .filter(|name| !name.is_empty() && !name.ends_with('/'))
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_loader_missing_dir() {
        let temp = tempdir().unwrap();
        let loader = TemplateLoader::new(temp.path().join("nope"));
        let renderer = loader.load_all().unwrap();
        assert!(renderer.template_names().is_empty());
    }

    #[test]
    fn test_template_name() {
        let loader = TemplateLoader::new("/templates");
        assert_eq!(
            loader.template_name(Path::new("/templates/cisco_ios/base.j2")),
            Some("cisco_ios/base".to_string())
        );
        assert_eq!(loader.template_name(Path::new("/templates/README.md")), None);
        assert_eq!(loader.template_name(Path::new("/templates/.j2")), None);
        assert_eq!(loader.template_name(Path::new("/elsewhere/base.j2")), None);

        let loader = TemplateLoader::new("/templates").with_extension(".tera");
        assert_eq!(
            loader.template_name(Path::new("/templates/junos/base.tera")),
            Some("junos/base".to_string())
        );
    }

    #[test]
    fn test_load_all_skips_other_files() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("ios")).unwrap();
        fs::write(temp.path().join("ios/base.j2"), "hostname {{ hostname }}").unwrap();
        fs::write(temp.path().join("ios/notes.txt"), "{{ broken").unwrap();

        let renderer = TemplateLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(renderer.template_names(), vec!["ios/base"]);
    }

    #[test]
    fn test_load_all_syntax_error() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("base.j2"), "{% if %}").unwrap();

        let err = TemplateLoader::new(temp.path()).load_all().unwrap_err();
        assert!(matches!(err, TemplateError::LoadFailed { .. }));
    }
}
