//! Apply pass over the changed components.
//!
//! ## Per-component protocol
//!
//! 1. Validate the component directory against its type's schemas.
//! 2. Skip the push in dry-run mode.
//! 3. Push the artifact payload to the remote service.
//! 4. Commit a new record to the in-memory state, fingerprinting the text
//!    read in step 1 so the record describes exactly what was pushed.
//!
//! A failure at step 1 or 3 is recorded for that component only; the loop
//! moves on. The caller persists the state once, after the loop.

use std::path::Path;

use chrono::Utc;

use ecli_core::{ComponentName, ComponentType};
use ecli_schema::{validate_component, ValidationErrors};

use crate::fingerprint;
use crate::remote::{Remote, RemoteError, UpdatePayload};
use crate::state_store::{StateRecord, SyncState};

/// A component resolved against the remote service and due for sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub name: ComponentName,
    pub remote_id: String,
    pub component_type: ComponentType,
}

/// Why a component was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentFailure {
    Validation(ValidationErrors),
    Remote(RemoteError),
}

impl std::fmt::Display for ComponentFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComponentFailure::Validation(errors) => write!(f, "validation failed: {errors}"),
            ComponentFailure::Remote(err) => err.fmt(f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failed {
    pub name: ComponentName,
    pub reason: ComponentFailure,
}

/// Outcome of applying a single component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    /// Pushed and recorded in the in-memory state.
    Applied { name: ComponentName },
    /// `--dry-run` mode: the component is valid and *would* have been pushed.
    WouldApply { name: ComponentName },
    Failed(Failed),
}

/// Validate, push and record one component.
pub fn apply_component<R: Remote + ?Sized>(
    components_dir: &Path,
    candidate: &Candidate,
    remote: &R,
    state: &mut SyncState,
    dry_run: bool,
) -> ApplyResult {
    let name = &candidate.name;
    let dir = components_dir.join(name.as_str());
    let fail = |reason| {
        ApplyResult::Failed(Failed {
            name: name.clone(),
            reason,
        })
    };

    let component = match validate_component(&dir, name, candidate.component_type) {
        Ok(component) => component,
        Err(errors) => {
            tracing::warn!(component = %name, %errors, "validation failed");
            return fail(ComponentFailure::Validation(errors));
        }
    };

    if dry_run {
        tracing::info!(component = %name, "[dry-run] would apply");
        return ApplyResult::WouldApply { name: name.clone() };
    }

    let payload = UpdatePayload::from_component(&component);
    if let Err(err) = remote.update(&candidate.remote_id, &payload) {
        tracing::warn!(component = %name, error = %err, "push failed");
        return fail(ComponentFailure::Remote(err));
    }

    // Record only kinds relevant to the current type; stale kinds are pruned.
    state.commit(
        name,
        StateRecord {
            last_applied: Utc::now(),
            file_hashes: fingerprint::of_component(&component),
        },
    );
    tracing::info!(component = %name, "applied");
    ApplyResult::Applied { name: name.clone() }
}

/// Apply every candidate in order, isolating failures.
pub fn apply_all<R: Remote + ?Sized>(
    components_dir: &Path,
    candidates: &[Candidate],
    remote: &R,
    state: &mut SyncState,
    dry_run: bool,
) -> Vec<ApplyResult> {
    candidates
        .iter()
        .map(|candidate| apply_component(components_dir, candidate, remote, state, dry_run))
        .collect()
}
