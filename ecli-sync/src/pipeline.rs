//! Sync pipeline entrypoints used by the CLI.
//!
//! Scan → resolve each name against the remote service → classify → apply
//! the changed ones → persist state once.

use std::path::Path;

use chrono::{DateTime, Utc};

use ecli_core::{ComponentName, ComponentType, Config, CoreError};
use ecli_schema::ValidationErrors;

use crate::apply::{apply_all, ApplyResult, Candidate, ComponentFailure, Failed};
use crate::change::{self, ChangeSignal};
use crate::remote::Remote;
use crate::scanner;
use crate::state_store::{self, SyncState};
use crate::SyncError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Treat every scanned component as changed.
    pub force: bool,
    /// Validate and report only: no push, no state write.
    pub dry_run: bool,
}

/// Overall result class of a run, used for the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    NothingToDo,
    Success,
    PartialFailure,
    TotalFailure,
}

/// Summary of one run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub dry_run: bool,
    /// Number of scanned components.
    pub considered: usize,
    pub unchanged: Vec<ComponentName>,
    /// Applied, or valid and would be applied under `dry_run`.
    pub succeeded: Vec<ComponentName>,
    pub failed: Vec<Failed>,
    /// Non-fatal scan and state-load problems.
    pub warnings: Vec<String>,
    /// Set when the final state write failed. Successes are still reported
    /// but will be detected as changed again next run.
    pub persist_error: Option<String>,
}

impl SyncReport {
    pub fn outcome(&self) -> RunOutcome {
        match (self.succeeded.is_empty(), self.failed.is_empty()) {
            (true, true) => RunOutcome::NothingToDo,
            (false, true) => RunOutcome::Success,
            (false, false) => RunOutcome::PartialFailure,
            (true, false) => RunOutcome::TotalFailure,
        }
    }

    fn absorb(&mut self, results: Vec<ApplyResult>) {
        for result in results {
            match result {
                ApplyResult::Applied { name } | ApplyResult::WouldApply { name } => {
                    self.succeeded.push(name)
                }
                ApplyResult::Failed(failed) => self.failed.push(failed),
            }
        }
    }
}

/// Run the changed-only sync over the components root.
pub fn run<R: Remote + ?Sized>(
    config: &Config,
    remote: &R,
    options: SyncOptions,
) -> Result<SyncReport, SyncError> {
    let root = require_root(config)?;
    let mut report = SyncReport {
        dry_run: options.dry_run,
        ..SyncReport::default()
    };

    let scan = scanner::scan(root);
    if let Some(err) = scan.error {
        report.warnings.push(err.to_string());
    }
    report.considered = scan.names.len() + scan.invalid.len();
    for (raw, reason) in scan.invalid {
        report.failed.push(Failed {
            name: ComponentName::from(raw),
            reason: ComponentFailure::Validation(ValidationErrors(vec![reason])),
        });
    }

    let mut state = load_state(config, &mut report);

    let mut changed = Vec::new();
    for name in scan.names {
        let Some(candidate) = resolve(remote, &name, &mut report) else {
            continue;
        };
        let dir = root.join(name.as_str());
        if options.force || change::has_changed(&dir, &name, candidate.component_type, &state) {
            changed.push(candidate);
        } else {
            tracing::debug!(component = %name, "unchanged");
            report.unchanged.push(name);
        }
    }

    let results = apply_all(root, &changed, remote, &mut state, options.dry_run);
    report.absorb(results);
    persist(config, &state, &mut report);
    Ok(report)
}

/// Validate and apply one named component regardless of its fingerprints.
///
/// A name outside `[a-z0-9-]+` is rejected before the remote is contacted.
pub fn apply_one<R: Remote + ?Sized>(
    config: &Config,
    remote: &R,
    name: &ComponentName,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    if !name.is_valid() {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        }
        .into());
    }
    let root = require_root(config)?;
    let dir = config.component_dir(name.as_str());
    if !dir.is_dir() {
        return Err(SyncError::UnknownComponent {
            name: name.to_string(),
            dir: root.to_path_buf(),
        });
    }

    let mut report = SyncReport {
        dry_run,
        considered: 1,
        ..SyncReport::default()
    };
    let mut state = load_state(config, &mut report);
    if let Some(candidate) = resolve(remote, name, &mut report) {
        let results = apply_all(root, &[candidate], remote, &mut state, dry_run);
        report.absorb(results);
    }
    persist(config, &state, &mut report);
    Ok(report)
}

/// Read-only classification of one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentStatus {
    Resolved {
        component_type: ComponentType,
        signal: ChangeSignal,
    },
    LookupFailed {
        reason: String,
    },
    /// The directory name is not a valid component name; never looked up.
    InvalidName {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub name: ComponentName,
    pub status: ComponentStatus,
    pub last_applied: Option<DateTime<Utc>>,
}

/// Classify every scanned component without pushing or writing anything.
pub fn status<R: Remote + ?Sized>(
    config: &Config,
    remote: &R,
) -> Result<Vec<StatusEntry>, SyncError> {
    let root = require_root(config)?;
    let scan = scanner::scan(root);
    if let Some(err) = scan.error {
        return Err(err);
    }
    let state = state_store::load(&config.state_path());

    let mut entries: Vec<StatusEntry> = scan
        .names
        .into_iter()
        .map(|name| {
            let last_applied = state.record(&name).map(|r| r.last_applied);
            let status = match remote.lookup(&name) {
                Ok(found) => {
                    let dir = root.join(name.as_str());
                    ComponentStatus::Resolved {
                        component_type: found.component_type,
                        signal: change::classify(&dir, &name, found.component_type, &state),
                    }
                }
                Err(err) => ComponentStatus::LookupFailed {
                    reason: err.to_string(),
                },
            };
            StatusEntry {
                name,
                status,
                last_applied,
            }
        })
        .collect();
    entries.extend(scan.invalid.into_iter().map(|(raw, reason)| StatusEntry {
        name: ComponentName::from(raw),
        status: ComponentStatus::InvalidName { reason },
        last_applied: None,
    }));
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_root(config: &Config) -> Result<&Path, SyncError> {
    let root = config.components_dir.as_path();
    if !root.is_dir() {
        return Err(SyncError::ComponentsRootMissing {
            path: root.to_path_buf(),
        });
    }
    Ok(root)
}

fn load_state(config: &Config, report: &mut SyncReport) -> SyncState {
    match state_store::try_load(&config.state_path()) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(error = %err, "starting from empty sync state");
            report.warnings.push(format!("{err}; starting from empty state"));
            SyncState::default()
        }
    }
}

fn resolve<R: Remote + ?Sized>(
    remote: &R,
    name: &ComponentName,
    report: &mut SyncReport,
) -> Option<Candidate> {
    match remote.lookup(name) {
        Ok(found) => Some(Candidate {
            name: name.clone(),
            remote_id: found.id,
            component_type: found.component_type,
        }),
        Err(err) => {
            tracing::warn!(component = %name, error = %err, "lookup failed");
            report.failed.push(Failed {
                name: name.clone(),
                reason: ComponentFailure::Remote(err),
            });
            None
        }
    }
}

/// Write the state once, and only when this run recorded something.
fn persist(config: &Config, state: &SyncState, report: &mut SyncReport) {
    if report.dry_run || report.succeeded.is_empty() {
        return;
    }
    if let Err(err) = state_store::save(&config.state_path(), state) {
        tracing::warn!(error = %err, "failed to persist sync state");
        report.persist_error = Some(err.to_string());
    }
}
