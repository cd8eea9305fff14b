//! Change detection.
//!
//! Signal precedence:
//! 1. `NeverSynced` (no state record for the component)
//! 2. `Changed` (a relevant artifact's fingerprint differs, appeared, or vanished)
//! 3. `Current`
//!
//! Only artifacts relevant to the component's current type are compared;
//! stale entries for other kinds in a stored record are ignored.

use std::path::Path;

use ecli_core::{ArtifactKind, ComponentName, ComponentType};

use crate::fingerprint::{self, Fingerprints};
use crate::state_store::SyncState;

/// Change classification for one component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeSignal {
    NeverSynced,
    Changed { artifacts: Vec<ArtifactKind> },
    Current,
}

impl ChangeSignal {
    pub fn needs_sync(&self) -> bool {
        !matches!(self, ChangeSignal::Current)
    }
}

/// Classify the component in `component_dir` against `state`.
pub fn classify(
    component_dir: &Path,
    name: &ComponentName,
    ty: ComponentType,
    state: &SyncState,
) -> ChangeSignal {
    let Some(record) = state.record(name) else {
        return ChangeSignal::NeverSynced;
    };
    let current = fingerprint::fingerprints(component_dir, ty);
    let artifacts = changed_artifacts(ty, &current, &record.file_hashes);
    if artifacts.is_empty() {
        ChangeSignal::Current
    } else {
        ChangeSignal::Changed { artifacts }
    }
}

/// Whether the component needs to be synced.
pub fn has_changed(
    component_dir: &Path,
    name: &ComponentName,
    ty: ComponentType,
    state: &SyncState,
) -> bool {
    classify(component_dir, name, ty, state).needs_sync()
}

/// Relevant kinds for `ty` whose fingerprint differs between `current` and
/// `stored`, in artifact order.
pub fn changed_artifacts(
    ty: ComponentType,
    current: &Fingerprints,
    stored: &Fingerprints,
) -> Vec<ArtifactKind> {
    ty.relevant_artifacts()
        .into_iter()
        .filter(|kind| current.get(kind) != stored.get(kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_store::StateRecord;
    use chrono::Utc;
    use std::fs;
    use tempfile::TempDir;

    fn synced(dir: &Path, name: &ComponentName, ty: ComponentType) -> SyncState {
        let mut state = SyncState::default();
        state.commit(
            name,
            StateRecord {
                last_applied: Utc::now(),
                file_hashes: fingerprint::fingerprints(dir, ty),
            },
        );
        state
    }

    #[test]
    fn never_synced_without_record() {
        let dir = TempDir::new().unwrap();
        let name = ComponentName::from("a");
        let signal = classify(dir.path(), &name, ComponentType::Basic, &SyncState::default());
        assert_eq!(signal, ChangeSignal::NeverSynced);
        assert!(signal.needs_sync());
    }

    #[test]
    fn current_right_after_recording() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credits.js"), "return 1").unwrap();
        let name = ComponentName::from("a");
        let state = synced(dir.path(), &name, ComponentType::Basic);
        assert!(!has_changed(dir.path(), &name, ComponentType::Basic, &state));
    }

    #[test]
    fn appearing_optional_artifact_is_a_change() {
        let dir = TempDir::new().unwrap();
        for file in ["form.json", "api.json", "credits.js"] {
            fs::write(dir.path().join(file), "{}").unwrap();
        }
        let name = ComponentName::from("a");
        let state = synced(dir.path(), &name, ComponentType::FetchApi);

        fs::write(dir.path().join("body.json"), "{}").unwrap();
        assert_eq!(
            classify(dir.path(), &name, ComponentType::FetchApi, &state),
            ChangeSignal::Changed {
                artifacts: vec![ArtifactKind::Body]
            }
        );
    }

    #[test]
    fn vanishing_artifact_is_a_change() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("credits.js"), "x").unwrap();
        let name = ComponentName::from("a");
        let state = synced(dir.path(), &name, ComponentType::Basic);

        fs::remove_file(dir.path().join("credits.js")).unwrap();
        assert!(has_changed(dir.path(), &name, ComponentType::Basic, &state));
    }

    #[test]
    fn stale_kinds_in_record_are_ignored() {
        let mut current = Fingerprints::new();
        current.insert(ArtifactKind::Credits, "c".into());
        let mut stored = current.clone();
        stored.insert(ArtifactKind::Workflow, "left over from comfy_workflow".into());

        assert!(changed_artifacts(ComponentType::Basic, &current, &stored).is_empty());
    }
}
