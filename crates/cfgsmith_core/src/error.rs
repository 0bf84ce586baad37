//! Error types for the core module.

use std::path::PathBuf;
use thiserror::Error;

use cfgsmith_merge::MergeError;
use cfgsmith_templates::TemplateError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while resolving, rendering or saving targets.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Expected a mapping at the top level of {path}, found {found}")]
    NotAMapping { path: PathBuf, found: &'static str },

    #[error("Failed to merge {path}: {source}")]
    Merge {
        path: PathBuf,
        #[source]
        source: MergeError,
    },

    #[error("Invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("Input directory does not exist: {0}")]
    MissingInput(PathBuf),

    #[error("Path {path} is outside of {root}")]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl CoreError {
    /// Whether the error comes from a malformed merge directive.
    pub fn is_merge_error(&self) -> bool {
        matches!(self, Self::Merge { .. })
    }
}
