//! Per-component validation.
//!
//! [`validate_component`] reads a component directory, checks that every
//! artifact required by the component type is present, and runs each present
//! relevant artifact through its schema. Nothing is written and no network
//! call is made.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use ecli_core::{ArtifactKind, ComponentName, ComponentType};

use crate::schemas;

/// Non-empty, ordered list of rule violations for one component.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }
}

/// Content of one artifact, read and parsed from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactContent {
    Json(Value),
    /// The credits script is sent as raw text.
    Script(String),
}

/// The artifacts of a component that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedComponent {
    pub name: ComponentName,
    pub component_type: ComponentType,
    pub artifacts: BTreeMap<ArtifactKind, ArtifactContent>,
    /// Text of each artifact exactly as it was read.
    pub sources: BTreeMap<ArtifactKind, String>,
}

impl ValidatedComponent {
    pub fn json(&self, kind: ArtifactKind) -> Option<&Value> {
        match self.artifacts.get(&kind) {
            Some(ArtifactContent::Json(value)) => Some(value),
            _ => None,
        }
    }

    pub fn credits_script(&self) -> Option<&str> {
        match self.artifacts.get(&ArtifactKind::Credits) {
            Some(ArtifactContent::Script(script)) => Some(script),
            _ => None,
        }
    }

    /// `output_node_id` from `workflow.json`, when the component has one.
    pub fn output_node_id(&self) -> Option<&str> {
        self.json(ArtifactKind::Workflow)?
            .get("output_node_id")?
            .as_str()
    }
}

/// Validate the component rooted at `dir` as a component of type `ty`.
///
/// Artifacts not relevant to `ty` are ignored even if present.
pub fn validate_component(
    dir: &Path,
    name: &ComponentName,
    ty: ComponentType,
) -> Result<ValidatedComponent, ValidationErrors> {
    let mut errors = Vec::new();
    if !name.is_valid() {
        errors.push(format!("component name '{name}' must match [a-z0-9-]+"));
    }

    let mut artifacts = BTreeMap::new();
    let mut sources = BTreeMap::new();
    for kind in ty.relevant_artifacts() {
        let required = ty.required_artifacts().contains(&kind);
        let path = dir.join(kind.file_name());
        match read_artifact(&path, kind) {
            Ok(Some((text, content))) => {
                if let ArtifactContent::Json(value) = &content {
                    errors.extend(
                        check_artifact(kind, value)
                            .into_iter()
                            .map(|msg| format!("{}: {msg}", kind.file_name())),
                    );
                }
                artifacts.insert(kind, content);
                sources.insert(kind, text);
            }
            Ok(None) if required => errors.push(format!(
                "{} is required for {ty} components but missing",
                kind.file_name()
            )),
            Ok(None) => {}
            Err(msg) => errors.push(msg),
        }
    }

    if errors.is_empty() {
        Ok(ValidatedComponent {
            name: name.clone(),
            component_type: ty,
            artifacts,
            sources,
        })
    } else {
        Err(ValidationErrors(errors))
    }
}

/// Run `value` through the schema registered for `kind`.
///
/// `test.json` and `body.json` only need to be well-formed JSON.
pub fn check_artifact(kind: ArtifactKind, value: &Value) -> Vec<String> {
    match kind {
        ArtifactKind::Form => schemas::check_form(value),
        ArtifactKind::Inputs => schemas::check_inputs(value),
        ArtifactKind::Api => schemas::check_api(value),
        ArtifactKind::Workflow => schemas::check_workflow(value),
        ArtifactKind::Test | ArtifactKind::Body | ArtifactKind::Credits => vec![],
    }
}

fn read_artifact(
    path: &Path,
    kind: ArtifactKind,
) -> Result<Option<(String, ArtifactContent)>, String> {
    let file_name = kind.file_name();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("{file_name} could not be read: {err}")),
    };
    if !kind.is_json() {
        return Ok(Some((text.clone(), ArtifactContent::Script(text))));
    }
    match serde_json::from_str(&text) {
        Ok(value) => Ok(Some((text, ArtifactContent::Json(value)))),
        Err(err) => Err(format!("{file_name}: invalid JSON: {err}")),
    }
}
