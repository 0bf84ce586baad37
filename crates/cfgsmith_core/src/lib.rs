//! # cfgsmith_core
//!
//! Variable hierarchy resolution and the rendering pipeline for cfgsmith.
//!
//! A project looks like this:
//!
//! ```text
//! my_projects/demo/
//!   my_config.yaml              optional settings overrides
//!   input_data/
//!     vars.yaml                 defaults for every target
//!     cisco_ios/
//!       vars.yaml               defaults for cisco_ios targets
//!       router/
//!         vars.yaml
//!         new_york.yaml         one target
//!   input_templates/
//!     cisco_ios/base.j2         template for every cisco_ios target
//!   output_data/
//!     cisco_ios/router/new_york.txt
//! ```
//!
//! Each target's variables are the ordered merge of every `vars.yaml` from the
//! input root down to the target's directory, then the target itself. The
//! first directory below the input root is the target type and selects the
//! template `<target_type>/base`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cfgsmith_core::{Generator, OutputWriter, Settings};
//! use cfgsmith_templates::TemplateLoader;
//!
//! let mut notes = Vec::new();
//! let settings = Settings::load(".", Some("demo"), &mut notes).unwrap();
//! let renderer = TemplateLoader::new(settings.input_templates_dir())
//!     .with_extension(settings.template_ext.clone())
//!     .load_all()
//!     .unwrap();
//!
//! let generator = Generator::new(&settings, renderer, OutputWriter::from_settings(&settings));
//! let summary = generator.run().unwrap();
//! println!("{} rendered, {} failed", summary.rendered.len(), summary.failures.len());
//! ```

pub mod bootstrap;
pub mod classifier;
pub mod error;
pub mod generator;
pub mod headers;
pub mod hierarchy;
pub mod output;
pub mod settings;

pub use bootstrap::{create_dirs, required_dirs, write_sample_config, DirStatus, SAMPLE_CONFIG};
pub use classifier::{classify, set_if_missing, target_type, Classification, TARGET_TYPE_KEY};
pub use error::{CoreError, CoreResult};
pub use generator::{Generator, RunSummary, TargetFailure, TargetRenderer};
pub use headers::HeaderLines;
pub use hierarchy::{load_mapping, path_segments, HierarchyResolver};
pub use output::{OutputSink, OutputWriter};
pub use settings::Settings;
