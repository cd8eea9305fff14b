//! `ecli status` — change classification for every component.

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use ecli_sync::{
    pipeline::{self, ComponentStatus, StatusEntry},
    ChangeSignal, HttpRemote,
};

use super::Globals;

/// Arguments for `ecli status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

impl StatusArgs {
    pub fn run(self, globals: &Globals) -> Result<ExitCode> {
        let config = globals.load_config()?;
        let remote = HttpRemote::new(&config.api_url);
        let entries = pipeline::status(&config, &remote).context("status check failed")?;

        if self.json {
            print_json(&entries)?;
        } else {
            print_table(&entries, &config.components_dir.display().to_string());
        }
        Ok(ExitCode::SUCCESS)
    }
}

#[derive(Serialize)]
struct StatusReportJson {
    summary: StatusSummaryJson,
    components: Vec<ComponentStatusJson>,
}

#[derive(Serialize)]
struct StatusSummaryJson {
    components: usize,
    needs_sync: usize,
}

#[derive(Serialize)]
struct ComponentStatusJson {
    name: String,
    #[serde(rename = "type")]
    component_type: Option<String>,
    status: &'static str,
    detail: String,
    last_applied: Option<String>,
}

#[derive(Tabled)]
struct StatusTableRow {
    #[tabled(rename = "component")]
    name: String,
    #[tabled(rename = "type")]
    component_type: String,
    #[tabled(rename = "status")]
    status: String,
    #[tabled(rename = "detail")]
    detail: String,
    #[tabled(rename = "last applied")]
    last_applied: String,
}

fn needs_sync(entry: &StatusEntry) -> bool {
    match &entry.status {
        ComponentStatus::Resolved { signal, .. } => signal.needs_sync(),
        ComponentStatus::LookupFailed { .. } | ComponentStatus::InvalidName { .. } => false,
    }
}

fn print_json(entries: &[StatusEntry]) -> Result<()> {
    let payload = StatusReportJson {
        summary: StatusSummaryJson {
            components: entries.len(),
            needs_sync: entries.iter().filter(|e| needs_sync(e)).count(),
        },
        components: entries
            .iter()
            .map(|entry| ComponentStatusJson {
                name: entry.name.to_string(),
                component_type: component_type(entry),
                status: status_key(&entry.status),
                detail: status_detail(&entry.status),
                last_applied: entry.last_applied.map(|t| t.to_rfc3339()),
            })
            .collect(),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).context("failed to serialize status JSON")?
    );
    Ok(())
}

fn print_table(entries: &[StatusEntry], root: &str) {
    let pending = entries.iter().filter(|e| needs_sync(e)).count();
    println!(
        "ecli v{} | {} | {} components | {} need sync",
        env!("CARGO_PKG_VERSION"),
        root,
        entries.len(),
        pending,
    );
    if entries.is_empty() {
        println!("No components found.");
        return;
    }

    let now = Utc::now();
    let rows: Vec<StatusTableRow> = entries
        .iter()
        .map(|entry| StatusTableRow {
            name: entry.name.to_string(),
            component_type: component_type(entry).unwrap_or_else(|| "?".to_string()),
            status: status_label(&entry.status),
            detail: status_detail(&entry.status),
            last_applied: entry
                .last_applied
                .map(|t| format_age(now, t))
                .unwrap_or_else(|| "never".to_string()),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    if pending > 0 {
        println!("Run 'ecli sync' to push changed components.");
    }
}

fn component_type(entry: &StatusEntry) -> Option<String> {
    match &entry.status {
        ComponentStatus::Resolved { component_type, .. } => Some(component_type.to_string()),
        ComponentStatus::LookupFailed { .. } | ComponentStatus::InvalidName { .. } => None,
    }
}

fn status_key(status: &ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::Resolved { signal, .. } => match signal {
            ChangeSignal::NeverSynced => "never_synced",
            ChangeSignal::Changed { .. } => "changed",
            ChangeSignal::Current => "current",
        },
        ComponentStatus::LookupFailed { .. } => "lookup_failed",
        ComponentStatus::InvalidName { .. } => "invalid_name",
    }
}

fn status_label(status: &ComponentStatus) -> String {
    match status {
        ComponentStatus::Resolved { signal, .. } => match signal {
            ChangeSignal::NeverSynced => "NEVER SYNCED".bright_black().bold().to_string(),
            ChangeSignal::Changed { .. } => "CHANGED".yellow().bold().to_string(),
            ChangeSignal::Current => "CURRENT".green().bold().to_string(),
        },
        ComponentStatus::LookupFailed { .. } => "UNKNOWN".red().bold().to_string(),
        ComponentStatus::InvalidName { .. } => "INVALID".red().bold().to_string(),
    }
}

fn status_detail(status: &ComponentStatus) -> String {
    match status {
        ComponentStatus::Resolved { signal, .. } => match signal {
            ChangeSignal::NeverSynced => "no sync record".to_string(),
            ChangeSignal::Current => "up to date".to_string(),
            ChangeSignal::Changed { artifacts } => {
                let files: Vec<&str> = artifacts.iter().map(|a| a.file_name()).collect();
                format!("{} edited", files.join(", "))
            }
        },
        ComponentStatus::LookupFailed { reason } | ComponentStatus::InvalidName { reason } => {
            reason.clone()
        }
    }
}

/// Coarse age such as `5m ago` or `3d ago`.
fn format_age(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds().max(0);
    match seconds {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", seconds / 60),
        3_600..=86_399 => format!("{}h ago", seconds / 3_600),
        _ => format!("{}d ago", seconds / 86_400),
    }
}
