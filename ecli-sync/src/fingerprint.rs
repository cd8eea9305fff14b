//! Content fingerprints for artifact files.
//!
//! A fingerprint is the lowercase hex SHA-256 of the file's raw bytes. No
//! normalisation is applied: whitespace and line-ending edits are changes.

use std::collections::BTreeMap;
use std::path::Path;

use sha2::{Digest, Sha256};

use ecli_core::{ArtifactKind, ComponentType};
use ecli_schema::ValidatedComponent;

/// Fingerprint of each artifact, keyed by kind.
pub type Fingerprints = BTreeMap<ArtifactKind, String>;

pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Fingerprint the file at `path`.
///
/// Returns `None` when the file is missing or unreadable, which callers treat
/// as "artifact absent". An empty file still has a fingerprint.
pub fn hash_file(path: &Path) -> Option<String> {
    match std::fs::read(path) {
        Ok(bytes) => Some(hash_bytes(&bytes)),
        Err(err) => {
            if err.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %err, "artifact unreadable");
            }
            None
        }
    }
}

/// Fingerprint every artifact of `component_dir` relevant to `ty`.
///
/// Absent artifacts have no entry.
pub fn fingerprints(component_dir: &Path, ty: ComponentType) -> Fingerprints {
    ty.relevant_artifacts()
        .into_iter()
        .filter_map(|kind| hash_file(&component_dir.join(kind.file_name())).map(|h| (kind, h)))
        .collect()
}

/// Fingerprint the artifact text a validated component was built from.
///
/// Matches [`fingerprints`] over the same files, without reading them again.
pub fn of_component(component: &ValidatedComponent) -> Fingerprints {
    component
        .sources
        .iter()
        .map(|(kind, text)| (*kind, hash_bytes(text.as_bytes())))
        .collect()
}
