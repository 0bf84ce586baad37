//! Rendering pipeline: discover targets, resolve, classify, render, save.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use cfgsmith_merge::VariableMapping;
use cfgsmith_templates::{TemplateRenderer, TemplateResult};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::classifier::classify;
use crate::error::{CoreError, CoreResult};
use crate::hierarchy::HierarchyResolver;
use crate::output::OutputSink;
use crate::settings::Settings;

/// Renders a named template against merged variables.
#[cfg_attr(test, mockall::automock)]
pub trait TargetRenderer {
    fn render(&self, template: &str, variables: &VariableMapping) -> TemplateResult<String>;
}

impl TargetRenderer for TemplateRenderer {
    fn render(&self, template: &str, variables: &VariableMapping) -> TemplateResult<String> {
        TemplateRenderer::render(self, template, variables)
    }
}

/// A target that could not be rendered.
#[derive(Debug)]
pub struct TargetFailure {
    pub path: PathBuf,
    pub error: CoreError,
}

/// Outcome of a full run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Targets rendered and saved.
    pub rendered: Vec<PathBuf>,
    /// Targets skipped because of an error.
    pub failures: Vec<TargetFailure>,
}

impl RunSummary {
    pub fn processed(&self) -> usize {
        self.rendered.len() + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Drives rendering of every target below the input root.
///
/// Each target is handled in isolation: a failing target is logged and
/// recorded, and the walk continues.
pub struct Generator<'a, R, S> {
    settings: &'a Settings,
    resolver: HierarchyResolver,
    renderer: R,
    sink: S,
}

impl<'a, R, S> Generator<'a, R, S>
where
    R: TargetRenderer,
    S: OutputSink,
{
    pub fn new(settings: &'a Settings, renderer: R, sink: S) -> Self {
        let resolver = HierarchyResolver::new(settings.input_data_dir(), &settings.vars_filename)
            .with_headers(settings.header_lines());
        Self {
            settings,
            resolver,
            renderer,
            sink,
        }
    }

    /// Find all target files, sorted by path.
    pub fn discover(&self) -> CoreResult<Vec<PathBuf>> {
        let root = self.resolver.input_root();
        if !root.is_dir() {
            return Err(CoreError::MissingInput(root.to_path_buf()));
        }

        let mut targets = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped(entry.file_name()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if self.is_target(&entry) {
                targets.push(entry.into_path());
            }
        }

        Ok(targets)
    }

    fn is_skipped(&self, name: &OsStr) -> bool {
        match &self.settings.skip_prefix {
            Some(prefix) if !prefix.is_empty() => name.to_string_lossy().starts_with(prefix.as_str()),
            _ => false,
        }
    }

    fn is_target(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_file() {
            return false;
        }
        let name = entry.file_name().to_string_lossy();
        let is_yaml = matches!(
            entry.path().extension().and_then(OsStr::to_str),
            Some("yaml" | "yml")
        );
        is_yaml
            && name != self.settings.vars_filename.as_str()
            && name != self.settings.config_override_filename.as_str()
    }

    /// Render every target, isolating failures per target.
    pub fn run(&self) -> CoreResult<RunSummary> {
        let root = self.resolver.input_root();
        info!("Start working on YAML files in {}", root.display());

        let mut summary = RunSummary::default();
        for path in self.discover()? {
            match self.process(&path) {
                Ok(()) => summary.rendered.push(path),
                Err(e) => {
                    error!("Skipping {}: {}", path.display(), e);
                    summary.failures.push(TargetFailure { path, error: e });
                }
            }
        }

        info!(
            "Finished: {} target(s) rendered, {} failed",
            summary.rendered.len(),
            summary.failures.len()
        );
        Ok(summary)
    }

    /// Resolve, classify, render and save one target.
    pub fn process(&self, path: &Path) -> CoreResult<()> {
        let root = self.resolver.input_root();
        let relative = path.strip_prefix(root).map_err(|_| CoreError::OutsideRoot {
            path: path.to_path_buf(),
            root: root.to_path_buf(),
        })?;

        let mut vars = self.resolver.resolve(relative)?;
        let classification = classify(
            relative,
            &mut vars,
            self.settings.filename_variable.as_deref(),
        );
        debug!("target_type -> {}", classification.target_type);
        if let Some((variable, value)) = &classification.filename_variable {
            debug!("{} -> {}", variable, value);
        }

        let rendered = self
            .renderer
            .render(&classification.template_name(), &vars)?;
        self.sink.save(relative, &rendered, &vars)?;

        info!("Processed: {}", path.display());
        Ok(())
    }
}
