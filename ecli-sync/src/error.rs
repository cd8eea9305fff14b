//! Error types for ecli-sync.

use std::path::PathBuf;

use thiserror::Error;

use ecli_core::CoreError;

/// Run-level errors. Per-component failures are reported through
/// [`crate::ComponentFailure`] instead and never abort a run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from configuration or domain parsing.
    #[error("{0}")]
    Core(#[from] CoreError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (state store).
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The components root is not a directory.
    #[error("components directory not found at {path}")]
    ComponentsRootMissing { path: PathBuf },

    /// The components root exists but could not be listed.
    #[error("cannot read components directory {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted state exists but could not be parsed.
    #[error("cannot load sync state from {path}: {source}")]
    StateLoad {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A directory already exists for the named component.
    #[error("component '{name}' already exists at {dir}")]
    ComponentExists { name: String, dir: PathBuf },

    /// No directory exists for the named component.
    #[error("component '{name}' not found in {dir}")]
    UnknownComponent { name: String, dir: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
