//! CLI command definitions.
//!
//! Each subcommand maps to one step of working on a cfgsmith project.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod init;
pub mod render;

/// cfgsmith - render device configurations from layered YAML variables
#[derive(Parser)]
#[command(name = "cfgsmith")]
#[command(version, about = "cfgsmith - render device configurations from layered YAML variables")]
#[command(long_about = r#"
cfgsmith renders one text file per target YAML file. Each target inherits
variables from every vars.yaml between the input root and its own directory,
and is rendered with the template <target_type>/base.j2, where target_type is
the first directory below the input root.

WORKFLOWS:
  init    → Create the project directories and a sample my_config.yaml
  render  → Merge variables and render every target

MERGE DIRECTIVES (in any vars or target file):
  key: false                  remove key
  key__remove: true           remove key
  key__remove: [items]        remove items from the list at key
  key__append: [items]        append items to the list at key
  __delete_keys__: [a.b.c]    delete nested keys by dotted path

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Configuration error
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Working directory for settings and relative paths
    #[arg(short = 'C', long, global = true, env = "CFGSMITH_DIR")]
    pub directory: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create project directories (after a countdown)
    Init(init::InitArgs),

    /// Render every target of a project
    Render(render::RenderArgs),
}

impl Commands {
    /// Project selected on the command line, if any.
    pub fn project(&self) -> Option<&str> {
        match self {
            Commands::Init(args) => args.project.as_deref(),
            Commands::Render(args) => args.project.as_deref(),
        }
    }
}
