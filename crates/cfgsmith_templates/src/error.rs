//! Error types for templates.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors that can occur during template operations.
#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load templates from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    #[error("Invalid variables for template {template}: {message}")]
    InvalidContext { template: String, message: String },

    #[error("Template rendering failed for {template}: {message}")]
    RenderingFailed { template: String, message: String },

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}
