//! Init command - create the project directories.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use cfgsmith_core::{create_dirs, required_dirs, write_sample_config, DirStatus, Settings};

#[derive(Args)]
pub struct InitArgs {
    /// Project name below the projects directory (defaults to base_dirname)
    pub project: Option<String>,

    /// Seconds to wait before creating anything (0 to skip)
    #[arg(short, long, default_value_t = 10)]
    pub timeout: u64,
}

pub async fn execute(args: InitArgs, settings: Settings) -> Result<()> {
    let dirs = required_dirs(&settings);
    info!("Initializing project at {:?}", settings.base_dir());

    if args.timeout > 0 {
        println!(
            "[!] In {} seconds I will create the following directories:",
            args.timeout
        );
        for dir in &dirs {
            println!("  {}", dir.display());
        }
        println!("[!] Press Ctrl+C to abort");

        if !countdown(args.timeout).await? {
            println!("[i] You may want to update my_config.yaml and run again");
            println!("[i] Exiting...");
            return Ok(());
        }
    }

    for (dir, status) in create_dirs(&dirs).context("Failed to create project directories")? {
        match status {
            DirStatus::Existing => println!("[.] Already exists: {}", dir.display()),
            DirStatus::Created => println!("[+] Created dir: {}", dir.display()),
        }
    }

    let config_path = settings.base_dir().join(&settings.config_override_filename);
    if write_sample_config(&config_path)? {
        println!("[+] Created a sample config: {}", config_path.display());
    } else {
        println!("[.] Already exists: {}", config_path.display());
    }

    Ok(())
}

/// Count down one second at a time. Returns `false` when interrupted.
async fn countdown(seconds: u64) -> Result<bool> {
    let mut stdout = std::io::stdout();
    for remaining in (1..=seconds).rev() {
        print!("\r[i] Continuing in {} seconds...", remaining);
        stdout.flush()?;

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(1)) => {}
            _ = tokio::signal::ctrl_c() => {
                println!();
                return Ok(false);
            }
        }
    }
    print!("\r{:40}\r", "");
    stdout.flush()?;
    Ok(true)
}
