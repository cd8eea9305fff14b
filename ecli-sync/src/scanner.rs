//! Component discovery.
//!
//! Every directory directly under the components root is a candidate, except
//! names starting with a reserved prefix and a short list of reserved names.

use std::path::Path;

use ecli_core::{config::STATE_FILE_NAME, ComponentName};

use crate::SyncError;

/// Entries starting with one of these characters are never components.
pub const RESERVED_PREFIXES: &[char] = &['.', '_'];

/// Literal entry names that are never components.
pub const RESERVED_NAMES: &[&str] = &[STATE_FILE_NAME, "node_modules"];

/// Outcome of a scan. `error` is set when the root could not be listed, in
/// which case `names` is empty.
#[derive(Debug, Default)]
pub struct Scan {
    pub names: Vec<ComponentName>,
    /// Directory names that are not valid component names, with the reason.
    pub invalid: Vec<(String, String)>,
    pub error: Option<SyncError>,
}

/// List candidate component names under `root`.
///
/// Never fails: an unreadable root yields an empty scan carrying the error.
/// Symlinked directories count as components. Names are sorted for stable
/// display.
pub fn scan(root: &Path) -> Scan {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(source) => {
            tracing::warn!(
                path = %root.display(),
                error = %source,
                "cannot read components directory"
            );
            return Scan {
                error: Some(SyncError::Scan {
                    path: root.to_path_buf(),
                    source,
                }),
                ..Scan::default()
            };
        }
    };

    let mut scan = Scan::default();
    let candidates = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !is_reserved(name));
    for raw in candidates {
        match ComponentName::parse(&raw) {
            Ok(name) => scan.names.push(name),
            Err(err) => {
                tracing::warn!(name = %raw, "skipping invalid component name");
                scan.invalid.push((raw, err.to_string()));
            }
        }
    }
    scan.names.sort();
    scan.invalid.sort();
    scan
}

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIXES) || RESERVED_NAMES.contains(&name)
}
