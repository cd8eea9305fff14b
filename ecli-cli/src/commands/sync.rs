//! `ecli sync` — push every component that changed since its last sync.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use ecli_sync::{pipeline, HttpRemote, SyncOptions};

use super::{exit_code, print_report, Globals};

/// Arguments for `ecli sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Treat every component as changed.
    #[arg(long)]
    pub force: bool,

    /// Validate and report without pushing or recording anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub fn run(self, globals: &Globals) -> Result<ExitCode> {
        let config = globals.load_config()?;
        let remote = HttpRemote::new(&config.api_url);
        let options = SyncOptions {
            force: self.force,
            dry_run: self.dry_run,
        };

        let report = pipeline::run(&config, &remote, options).context("sync failed")?;
        print_report(&report);
        Ok(exit_code(report.outcome()))
    }
}
