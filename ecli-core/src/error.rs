//! Error types for ecli-core.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from configuration and domain-type parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Underlying I/O failure, annotated with the path involved.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (save path).
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON parse error on load, with the file path for context.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `dirs::home_dir()` returned `None`, so `~/.ecli/` cannot be located.
    #[error("cannot determine home directory; set $HOME or equivalent")]
    HomeNotFound,

    /// The config file did not exist at the expected path.
    #[error("configuration file not found at {path}; run `ecli init` first")]
    ConfigNotFound { path: PathBuf },

    #[error("invalid component name '{name}': must match [a-z0-9-]+")]
    InvalidName { name: String },

    #[error("unknown component type '{value}'; expected: basic, comfy_workflow, fetch_api")]
    UnknownType { value: String },
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> CoreError {
    CoreError::Io {
        path: path.into(),
        source,
    }
}
