//! Render command - merge variables and render every target.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cfgsmith_core::{Generator, OutputWriter, Settings};
use cfgsmith_templates::TemplateLoader;

#[derive(Args)]
pub struct RenderArgs {
    /// Project name below the projects directory (defaults to base_dirname)
    pub project: Option<String>,

    /// Also write merged variables of every target as YAML
    #[arg(long)]
    pub save_merged: bool,

    /// Directory for merged YAML files (implies --save-merged)
    #[arg(long)]
    pub merged_path: Option<PathBuf>,

    /// Skip YAML files and directories starting with this prefix
    #[arg(long)]
    pub skip_prefix: Option<String>,

    /// Variable to set from the target file name when missing (e.g. hostname)
    #[arg(long)]
    pub filename_variable: Option<String>,
}

impl RenderArgs {
    /// Apply command line overrides on top of loaded settings.
    fn apply(self, settings: &mut Settings) {
        if self.save_merged {
            settings.save_merged_yamls = true;
        }
        if let Some(path) = self.merged_path {
            settings.save_merged_yamls = true;
            settings.merged_yamls_path = Some(path);
        }
        if let Some(prefix) = self.skip_prefix {
            settings.skip_prefix = Some(prefix);
        }
        if let Some(variable) = self.filename_variable {
            settings.filename_variable = Some(variable);
        }
    }
}

pub async fn execute(args: RenderArgs, mut settings: Settings) -> Result<()> {
    args.apply(&mut settings);

    let templates_dir = settings.input_templates_dir();
    let renderer = TemplateLoader::new(&templates_dir)
        .with_extension(settings.template_ext.clone())
        .load_all()
        .with_context(|| format!("Failed to load templates from {}", templates_dir.display()))?;
    info!("Templates: {}", renderer.template_names().join(", "));

    let generator = Generator::new(&settings, renderer, OutputWriter::from_settings(&settings));
    let summary = generator.run()?;

    println!(
        "✅ Rendered {} target(s) into {}",
        summary.rendered.len(),
        settings.output_data_dir().display()
    );
    if !summary.is_success() {
        println!("⚠️  {} target(s) skipped:", summary.failures.len());
        for failure in &summary.failures {
            println!("  {} - {}", failure.path.display(), failure.error);
        }
    }

    Ok(())
}
