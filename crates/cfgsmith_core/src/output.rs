//! Persistence of rendered targets.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use cfgsmith_merge::VariableMapping;
use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::settings::Settings;

/// Destination for rendered targets.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink {
    /// Save a rendered target, returning the files written.
    fn save(
        &self,
        relative_path: &Path,
        rendered: &str,
        merged: &VariableMapping,
    ) -> CoreResult<Vec<PathBuf>>;
}

/// Writes rendered text (and optionally merged variables) to disk, mirroring
/// the input tree.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    output_ext: String,
    merged_dir: Option<PathBuf>,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>, output_ext: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            output_ext: output_ext.into(),
            merged_dir: None,
        }
    }

    /// Also dump merged variables as YAML below `merged_dir`.
    pub fn with_merged_dir(mut self, merged_dir: impl Into<PathBuf>) -> Self {
        self.merged_dir = Some(merged_dir.into());
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let writer = Self::new(settings.output_data_dir(), settings.output_ext.clone());
        if settings.save_merged_yamls {
            writer.with_merged_dir(settings.merged_yamls_dir())
        } else {
            writer
        }
    }

    /// Where the rendered text of a target goes.
    pub fn text_path(&self, relative_path: &Path) -> PathBuf {
        self.output_dir
            .join(swap_extension(relative_path, &self.output_ext))
    }

    /// Where the merged variables of a target go, if enabled.
    pub fn merged_path(&self, relative_path: &Path) -> Option<PathBuf> {
        self.merged_dir
            .as_ref()
            .map(|dir| dir.join(swap_extension(relative_path, ".yaml")))
    }
}

impl OutputSink for OutputWriter {
    fn save(
        &self,
        relative_path: &Path,
        rendered: &str,
        merged: &VariableMapping,
    ) -> CoreResult<Vec<PathBuf>> {
        let mut written = Vec::new();

        let text_path = self.text_path(relative_path);
        write_file(&text_path, rendered)?;
        info!("Created: {}", text_path.display());
        written.push(text_path);

        if let Some(yaml_path) = self.merged_path(relative_path) {
            let yaml = serde_yaml::to_string(merged).map_err(|e| CoreError::Write {
                path: yaml_path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            })?;
            write_file(&yaml_path, &yaml)?;
            info!("Created: {}", yaml_path.display());
            written.push(yaml_path);
        }

        Ok(written)
    }
}

/// Replace the last extension of a path; `extension` includes the dot.
fn swap_extension(path: &Path, extension: &str) -> PathBuf {
    let mut name: OsString = path.with_extension("").into_os_string();
    name.push(extension);
    PathBuf::from(name)
}

fn write_file(path: &Path, content: &str) -> CoreResult<()> {
    let to_error = |source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(to_error)?;
    }
    fs::write(path, content).map_err(to_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_swap_extension() {
        assert_eq!(
            swap_extension(Path::new("ios/core/r1.yaml"), ".txt"),
            PathBuf::from("ios/core/r1.txt")
        );
        assert_eq!(
            swap_extension(Path::new("ios/r1.v2.yml"), ".cfg"),
            PathBuf::from("ios/r1.v2.cfg")
        );
        assert_eq!(swap_extension(Path::new("r1.yaml"), ""), PathBuf::from("r1"));
    }

    #[test]
    fn test_save_text_only() {
        let temp = tempdir().unwrap();
        let writer = OutputWriter::new(temp.path().join("out"), ".txt");

        let written = writer
            .save(Path::new("ios/r1.yaml"), "hostname r1\n", &VariableMapping::new())
            .unwrap();
        assert_eq!(written, vec![temp.path().join("out/ios/r1.txt")]);
        assert_eq!(
            fs::read_to_string(temp.path().join("out/ios/r1.txt")).unwrap(),
            "hostname r1\n"
        );
        assert!(writer.merged_path(Path::new("ios/r1.yaml")).is_none());
    }

    #[test]
    fn test_save_with_merged_yaml() {
        let temp = tempdir().unwrap();
        let writer =
            OutputWriter::new(temp.path().join("out"), ".cfg").with_merged_dir(temp.path().join("merged"));
        let merged: VariableMapping = serde_yaml::from_str("hostname: r1\nmtu: 1500").unwrap();

        let written = writer.save(Path::new("ios/r1.yml"), "x", &merged).unwrap();
        assert_eq!(written.len(), 2);

        let dumped = fs::read_to_string(temp.path().join("merged/ios/r1.yaml")).unwrap();
        let reloaded: VariableMapping = serde_yaml::from_str(&dumped).unwrap();
        assert_eq!(reloaded, merged);
    }

    #[test]
    fn test_from_settings_default_merged_dir() {
        let settings = Settings {
            working_dir: PathBuf::from("/work"),
            save_merged_yamls: true,
            ..Settings::default()
        };
        let writer = OutputWriter::from_settings(&settings);
        assert_eq!(
            writer.merged_path(Path::new("ios/r1.yaml")),
            Some(PathBuf::from("/work/my_projects/demo/output_data/yamls/ios/r1.yaml"))
        );
        assert_eq!(
            writer.text_path(Path::new("ios/r1.yaml")),
            PathBuf::from("/work/my_projects/demo/output_data/ios/r1.txt")
        );
    }
}
