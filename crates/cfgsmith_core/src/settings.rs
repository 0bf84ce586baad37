//! Project settings.
//!
//! Settings start from built-in defaults and may be overridden by YAML files
//! named `config_override_filename` (default `my_config.yaml`):
//!
//! 1. the global file in the working directory
//! 2. the project selected on the command line (`<projects_dirname>/<name>`)
//! 3. the local file in the project's base directory
//!
//! Only known keys are applied. Missing, unreadable or malformed override
//! files are skipped. Each decision is kept as a note so it can be logged once
//! logging is set up.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, CoreResult};
use crate::headers::HeaderLines;

/// All configurable knobs of a cfgsmith project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding named projects.
    pub projects_dirname: String,
    /// Project base directory; all project directories live below it.
    pub base_dirname: PathBuf,
    pub input_data_dirname: String,
    pub input_templates_dirname: String,
    pub output_data_dirname: String,
    /// Name of override files; never treated as a target.
    pub config_override_filename: String,
    /// Name of per-directory variables files.
    pub vars_filename: String,
    /// Extension of rendered files, including the dot.
    pub output_ext: String,
    /// Extension of template files, including the dot.
    pub template_ext: String,
    /// Dotted variable set from the target's file stem when missing,
    /// e.g. `hostname` or `device.name`.
    pub filename_variable: Option<String>,
    /// Skip directories and files starting with this prefix.
    pub skip_prefix: Option<String>,
    /// Also write the merged variables of each target as YAML.
    pub save_merged_yamls: bool,
    /// Root for merged YAML files; defaults to `<output>/yamls`.
    pub merged_yamls_path: Option<PathBuf>,
    /// Default log level when `RUST_LOG` is not set.
    pub log_level: String,
    /// Header line templates for structured debug output.
    pub log_lines: BTreeMap<u8, String>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub working_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            projects_dirname: "my_projects".to_string(),
            base_dirname: PathBuf::from("my_projects/demo"),
            input_data_dirname: "input_data".to_string(),
            input_templates_dirname: "input_templates".to_string(),
            output_data_dirname: "output_data".to_string(),
            config_override_filename: "my_config.yaml".to_string(),
            vars_filename: "vars.yaml".to_string(),
            output_ext: ".txt".to_string(),
            template_ext: ".j2".to_string(),
            filename_variable: None,
            skip_prefix: None,
            save_merged_yamls: false,
            merged_yamls_path: None,
            log_level: "warn".to_string(),
            log_lines: HeaderLines::default().into_inner(),
            working_dir: PathBuf::from("."),
        }
    }
}

impl Settings {
    /// Load settings for `working_dir`, optionally selecting a named project.
    ///
    /// Notes describing applied and skipped overrides are pushed to `notes`.
    pub fn load(
        working_dir: impl Into<PathBuf>,
        project: Option<&str>,
        notes: &mut Vec<String>,
    ) -> CoreResult<Self> {
        let mut settings = Self {
            working_dir: working_dir.into(),
            ..Self::default()
        };

        let global = settings.working_dir.join(&settings.config_override_filename);
        settings.apply_override_file(&global, notes)?;

        if let Some(name) = project {
            let base = Path::new(&settings.projects_dirname).join(name);
            notes.push(format!(
                "Selected project {:?}: base_dirname {:?} -> {:?}",
                name, settings.base_dirname, base
            ));
            settings.base_dirname = base;
        }

        if settings.base_dirname != Path::new(".") {
            let local = settings.base_dir().join(&settings.config_override_filename);
            settings.apply_override_file(&local, notes)?;
        }

        Ok(settings)
    }

    /// Apply one override file if it exists and holds a mapping.
    pub fn apply_override_file(&mut self, path: &Path, notes: &mut Vec<String>) -> CoreResult<()> {
        if !path.exists() {
            notes.push(format!("Skipping {}: Not found", path.display()));
            return Ok(());
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                notes.push(format!("Skipping {}: {}", path.display(), e));
                return Ok(());
            }
        };

        let overrides = match serde_yaml::from_str::<Value>(&content) {
            Ok(Value::Mapping(mapping)) => mapping,
            Ok(Value::Null) => Mapping::new(),
            Ok(_) => {
                notes.push(format!("Skipping {}: expected a mapping", path.display()));
                return Ok(());
            }
            Err(e) => {
                notes.push(format!("Skipping {}: {}", path.display(), e));
                return Ok(());
            }
        };

        notes.push(format!("Start processing {}", path.display()));
        self.apply_overrides(&overrides, notes)
            .map_err(|message| CoreError::Config {
                path: path.to_path_buf(),
                message,
            })?;
        notes.push(format!("Done processing {}", path.display()));
        Ok(())
    }

    /// Apply known keys of `overrides` onto these settings.
    pub fn apply_overrides(
        &mut self,
        overrides: &Mapping,
        notes: &mut Vec<String>,
    ) -> Result<(), String> {
        let Value::Mapping(mut current) = serde_yaml::to_value(&*self).map_err(|e| e.to_string())?
        else {
            return Err("settings did not serialize to a mapping".to_string());
        };

        for (key, value) in overrides {
            match current.get_mut(key) {
                Some(slot) => {
                    notes.push(format!(
                        "  override {}: {} -> {}",
                        describe(key),
                        describe(slot),
                        describe(value)
                    ));
                    *slot = value.clone();
                }
                None => notes.push(format!("  ignore unknown key {}", describe(key))),
            }
        }

        let mut updated: Settings =
            serde_yaml::from_value(Value::Mapping(current)).map_err(|e| e.to_string())?;
        updated.working_dir = std::mem::take(&mut self.working_dir);
        *self = updated;
        Ok(())
    }

    /// Project base directory.
    pub fn base_dir(&self) -> PathBuf {
        self.working_dir.join(&self.base_dirname)
    }

    /// Root of target and variables files.
    pub fn input_data_dir(&self) -> PathBuf {
        self.base_dir().join(&self.input_data_dirname)
    }

    /// Root of template files.
    pub fn input_templates_dir(&self) -> PathBuf {
        self.base_dir().join(&self.input_templates_dirname)
    }

    /// Root of rendered output.
    pub fn output_data_dir(&self) -> PathBuf {
        self.base_dir().join(&self.output_data_dirname)
    }

    /// Root of merged YAML dumps.
    pub fn merged_yamls_dir(&self) -> PathBuf {
        match &self.merged_yamls_path {
            Some(path) => self.working_dir.join(path),
            None => self.output_data_dir().join("yamls"),
        }
    }

    /// Header line templates.
    pub fn header_lines(&self) -> HeaderLines {
        HeaderLines::new(self.log_lines.clone())
    }
}

fn describe(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", value))
}
