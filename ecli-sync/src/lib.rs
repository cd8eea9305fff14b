//! # ecli-sync
//!
//! Change detection and incremental sync of components to the remote service.
//!
//! Call [`pipeline::run`] for a changed-only sync of every component, or
//! [`pipeline::apply_one`] to push a single named component.

pub mod apply;
pub mod change;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod remote;
pub mod scaffold;
pub mod scanner;
pub mod state_store;

pub use apply::{ApplyResult, Candidate, ComponentFailure, Failed};
pub use change::ChangeSignal;
pub use error::SyncError;
pub use pipeline::{RunOutcome, SyncOptions, SyncReport};
pub use remote::{HttpRemote, Remote, RemoteComponent, RemoteError, UpdatePayload};
pub use state_store::{StateRecord, SyncState};
