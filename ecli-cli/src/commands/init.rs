//! `ecli init` — write the default config file.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use ecli_core::config;

/// Create ~/.ecli/config.json with default settings.
#[derive(Args, Debug)]
pub struct InitArgs {}

impl InitArgs {
    pub fn run(self) -> Result<ExitCode> {
        let (file, created) = config::init().context("failed to initialize ecli config")?;
        let path = config::config_path().context("could not determine home directory")?;

        if created {
            println!("✓ Wrote default config to {}", path.display());
        } else {
            println!("✓ Config already present at {}", path.display());
        }
        println!("  apiUrl: {}", file.api_url);
        match &file.components_dir {
            Some(dir) => println!("  componentsDir: {}", dir.display()),
            None => println!("  componentsDir: ./{}", config::DEFAULT_COMPONENTS_DIR),
        }
        Ok(ExitCode::SUCCESS)
    }
}
