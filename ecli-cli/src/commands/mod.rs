//! Subcommand implementations and the pieces they share.

pub mod apply;
pub mod component;
pub mod init;
pub mod status;
pub mod sync;
pub mod validate;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use ecli_core::{config, Config};
use ecli_sync::{RunOutcome, SyncReport};

/// Environment variable overriding `apiUrl` from the config file.
pub const API_URL_ENV: &str = "ECLI_API_URL";

/// Flags accepted by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    pub components_dir: Option<PathBuf>,
}

impl Globals {
    /// Config file, then `ECLI_API_URL`, then `--components-dir`.
    pub fn load_config(&self) -> Result<Config> {
        let cwd = std::env::current_dir().context("could not determine working directory")?;
        let mut config = config::load(&cwd).context("failed to load ecli config")?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config = config.with_api_url(url.trim());
            }
        }
        if let Some(dir) = &self.components_dir {
            let dir = if dir.is_absolute() { dir.clone() } else { cwd.join(dir) };
            config = config.with_components_dir(dir);
        }
        tracing::debug!(
            api_url = %config.api_url,
            components_dir = %config.components_dir.display(),
            "resolved config"
        );
        Ok(config)
    }
}

pub fn exit_code(outcome: RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Success => ExitCode::SUCCESS,
        RunOutcome::PartialFailure | RunOutcome::TotalFailure => ExitCode::from(2),
        RunOutcome::NothingToDo => ExitCode::from(3),
    }
}

/// Print a run report to stdout, warnings to stderr.
pub fn print_report(report: &SyncReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    for warning in &report.warnings {
        eprintln!("{} {warning}", "warning:".yellow().bold());
    }

    for name in &report.succeeded {
        if report.dry_run {
            println!("{prefix}{}  {name}", "~".cyan());
        } else {
            println!("{}  {name}", "✓".green().bold());
        }
    }
    for failed in &report.failed {
        println!("{prefix}{}  {}: {}", "✗".red().bold(), failed.name, failed.reason);
    }

    let verb = if report.dry_run { "would apply" } else { "applied" };
    match report.outcome() {
        RunOutcome::NothingToDo => println!(
            "{prefix}nothing to do ({} component(s), all current)",
            report.considered
        ),
        _ => println!(
            "{prefix}{} {verb}, {} failed, {} unchanged",
            report.succeeded.len(),
            report.failed.len(),
            report.unchanged.len()
        ),
    }

    if let Some(err) = &report.persist_error {
        eprintln!(
            "{} applied components were pushed but sync state was not saved: {err}",
            "warning:".yellow().bold()
        );
    }
}
