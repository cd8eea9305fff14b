//! Schema registry and validator for ecli components.
//!
//! [`schemas`] holds one structural schema per artifact kind; [`validator`]
//! selects the schemas that apply to a component type and runs them.

pub mod schemas;
pub mod validator;

pub use schemas::{
    ApiConfig, ApiContract, FormField, InputMapping, Retrieval, WorkflowConfig,
};
pub use validator::{
    check_artifact, validate_component, ArtifactContent, ValidatedComponent, ValidationErrors,
};
