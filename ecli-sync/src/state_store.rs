//! State store — persisted fingerprints of the last successful sync.
//!
//! Persists a [`SyncState`] JSON document at
//! `<components_dir>/.ecli-state.json`:
//!
//! ```text
//! { "components": { "<name>": { "lastApplied": "<RFC 3339>",
//!                               "fileHashes": { "<kind>": "<hex>" } } } }
//! ```
//!
//! Writes use an atomic `.tmp` + rename so a reader never sees a partial file.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecli_core::ComponentName;

use crate::error::{io_err, SyncError};
use crate::fingerprint::Fingerprints;

/// Fingerprints and time of one component's last successful sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRecord {
    pub last_applied: DateTime<Utc>,
    #[serde(default)]
    pub file_hashes: Fingerprints,
}

/// All records, keyed by component name. A missing record means the
/// component has never been synced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    pub components: BTreeMap<String, StateRecord>,
}

impl SyncState {
    pub fn record(&self, name: &ComponentName) -> Option<&StateRecord> {
        self.components.get(name.as_str())
    }

    /// Replace the record for `name` wholesale.
    pub fn commit(&mut self, name: &ComponentName, record: StateRecord) {
        self.components.insert(name.0.clone(), record);
    }
}

// Early state files were a bare `{ name: record }` map.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SyncStateCompat {
    Structured(SyncState),
    Legacy(BTreeMap<String, StateRecord>),
}

/// Load the state at `path`.
///
/// Returns an empty state if the file does not yet exist, and
/// `SyncError::StateLoad` if it exists but is not a valid state document.
pub fn try_load(path: &Path) -> Result<SyncState, SyncError> {
    if !path.exists() {
        return Ok(SyncState::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    match serde_json::from_str::<SyncStateCompat>(&contents) {
        Ok(SyncStateCompat::Structured(state)) => Ok(state),
        Ok(SyncStateCompat::Legacy(components)) => Ok(SyncState { components }),
        Err(source) => Err(SyncError::StateLoad {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Load the state at `path`, degrading to an empty state on any failure.
pub fn load(path: &Path) -> SyncState {
    try_load(path).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "starting from empty sync state");
        SyncState::default()
    })
}

/// Save `state` to `path` atomically.
///
/// Writes to `<path>.tmp` then renames to `<path>`.
pub fn save(path: &Path, state: &SyncState) -> Result<(), SyncError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
    }

    let json = serde_json::to_string_pretty(state)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
