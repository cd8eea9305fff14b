//! ecli core library: domain types, configuration, errors.
//!
//! - [`types`] — component names, types and artifact kinds
//! - [`config`] — the explicitly threaded [`Config`] value and its file
//! - [`error`] — [`CoreError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::CoreError;
pub use types::{ArtifactKind, ComponentName, ComponentType};
