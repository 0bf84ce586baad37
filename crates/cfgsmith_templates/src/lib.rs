//! # cfgsmith_templates
//!
//! Template loading and rendering for cfgsmith.
//!
//! Templates are Jinja-style files (rendered with Tera) stored under the
//! templates directory, one subdirectory per target type:
//!
//! ```text
//! input_templates/
//!   cisco_ios/base.j2
//!   juniper/base.j2
//!   common/banner.j2
//! ```
//!
//! Each file is registered under its relative path without extension
//! (`cisco_ios/base`), which is also the name used by `include`/`extends`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cfgsmith_templates::TemplateLoader;
//! use serde_yaml::Mapping;
//!
//! let renderer = TemplateLoader::new("input_templates").load_all().unwrap();
//! let vars: Mapping = serde_yaml::from_str("hostname: r1").unwrap();
//! let text = renderer.render("cisco_ios/base", &vars).unwrap();
//! ```

pub mod error;
pub mod loader;
pub mod renderer;

pub use error::{TemplateError, TemplateResult};
pub use loader::{TemplateLoader, DEFAULT_TEMPLATE_EXT};
pub use renderer::{format_tera_error, TemplateRenderer};
