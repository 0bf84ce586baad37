//! Project bootstrap: working directories and a sample override file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{CoreError, CoreResult};
use crate::settings::Settings;

/// Commented override file written into new projects.
pub const SAMPLE_CONFIG: &str = r#"# cfgsmith project settings
#
# Every key is optional; uncomment to override the built-in default.

# vars_filename: vars.yaml
# output_ext: .txt
# template_ext: .j2

# Name of a variable to derive from the target file name when it is not set,
# e.g. `hostname` turns GW01.yaml into {hostname: GW01} and `person.name`
# turns Alex.yaml into {person: {name: Alex}}.
# filename_variable: hostname

# Skip YAML files and directories starting with this prefix.
# skip_prefix: _

# Also write the merged variables of every target as YAML, by default under
# <output_data>/yamls, or under merged_yamls_path when set.
# save_merged_yamls: false
# merged_yamls_path: merged_yamls

# Default log level when RUST_LOG is not set: error, warn, info, debug, trace.
# log_level: warn
"#;

/// Whether a directory was created or already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existing,
}

/// Directories a project needs.
pub fn required_dirs(settings: &Settings) -> Vec<PathBuf> {
    vec![
        settings.input_data_dir(),
        settings.input_templates_dir(),
        settings.output_data_dir(),
        settings.merged_yamls_dir(),
    ]
}

/// Create missing directories.
pub fn create_dirs(dirs: &[PathBuf]) -> CoreResult<Vec<(PathBuf, DirStatus)>> {
    dirs.iter()
        .map(|dir| {
            if dir.is_dir() {
                return Ok((dir.clone(), DirStatus::Existing));
            }
            fs::create_dir_all(dir).map_err(|source| CoreError::Write {
                path: dir.clone(),
                source,
            })?;
            info!("Created dir: {}", dir.display());
            Ok((dir.clone(), DirStatus::Created))
        })
        .collect()
}

/// Write [`SAMPLE_CONFIG`] to `path` unless a file is already there.
///
/// Returns `true` when the file was written.
pub fn write_sample_config(path: &Path) -> CoreResult<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| CoreError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, SAMPLE_CONFIG).map_err(|source| CoreError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Created sample config: {}", path.display());
    Ok(true)
}
