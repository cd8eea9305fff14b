//! `ecli apply <name>` — validate and push one component.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use ecli_core::ComponentName;
use ecli_sync::{pipeline, HttpRemote};

use super::{exit_code, print_report, Globals};

/// Arguments for `ecli apply`.
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Component directory name under the components root.
    pub name: String,

    /// Validate and report without pushing or recording anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl ApplyArgs {
    pub fn run(self, globals: &Globals) -> Result<ExitCode> {
        let config = globals.load_config()?;
        let remote = HttpRemote::new(&config.api_url);
        let name = ComponentName::parse(&self.name).context("invalid component name")?;

        let report = pipeline::apply_one(&config, &remote, &name, self.dry_run)
            .with_context(|| format!("apply failed for '{name}'"))?;
        print_report(&report);
        Ok(exit_code(report.outcome()))
    }
}
