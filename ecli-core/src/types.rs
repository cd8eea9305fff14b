//! Domain types for ecli components.
//!
//! A component is a directory of artifact files. Which artifacts it must and
//! may carry is fully determined by its [`ComponentType`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("component name pattern compiles"));

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A component identifier, also the name of its directory on disk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentName(pub String);

impl ComponentName {
    /// Parse a name, rejecting anything outside `[a-z0-9-]+`.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if NAME_PATTERN.is_match(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(CoreError::InvalidName {
                name: s.to_owned(),
            })
        }
    }

    /// Whether the wrapped string satisfies the naming rule.
    pub fn is_valid(&self) -> bool {
        NAME_PATTERN.is_match(&self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ComponentName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ComponentName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One named file belonging to a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Form,
    Inputs,
    Workflow,
    Test,
    Api,
    Body,
    Credits,
}

impl ArtifactKind {
    pub fn all() -> &'static [ArtifactKind] {
        &[
            ArtifactKind::Form,
            ArtifactKind::Inputs,
            ArtifactKind::Workflow,
            ArtifactKind::Test,
            ArtifactKind::Api,
            ArtifactKind::Body,
            ArtifactKind::Credits,
        ]
    }

    /// File name of this artifact inside a component directory.
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Form => "form.json",
            ArtifactKind::Inputs => "inputs.json",
            ArtifactKind::Workflow => "workflow.json",
            ArtifactKind::Test => "test.json",
            ArtifactKind::Api => "api.json",
            ArtifactKind::Body => "body.json",
            ArtifactKind::Credits => "credits.js",
        }
    }

    /// Every artifact except the credits script is a JSON document.
    pub fn is_json(self) -> bool {
        !matches!(self, ArtifactKind::Credits)
    }

    pub fn key(self) -> &'static str {
        match self {
            ArtifactKind::Form => "form",
            ArtifactKind::Inputs => "inputs",
            ArtifactKind::Workflow => "workflow",
            ArtifactKind::Test => "test",
            ArtifactKind::Api => "api",
            ArtifactKind::Body => "body",
            ArtifactKind::Credits => "credits",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The kind of a component. Determines its artifact set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    #[default]
    Basic,
    ComfyWorkflow,
    FetchApi,
}

impl ComponentType {
    pub fn all() -> &'static [ComponentType] {
        &[
            ComponentType::Basic,
            ComponentType::ComfyWorkflow,
            ComponentType::FetchApi,
        ]
    }

    pub fn required_artifacts(self) -> &'static [ArtifactKind] {
        match self {
            ComponentType::Basic => &[ArtifactKind::Credits],
            ComponentType::FetchApi => {
                &[ArtifactKind::Form, ArtifactKind::Api, ArtifactKind::Credits]
            }
            ComponentType::ComfyWorkflow => &[
                ArtifactKind::Form,
                ArtifactKind::Inputs,
                ArtifactKind::Workflow,
                ArtifactKind::Test,
                ArtifactKind::Credits,
            ],
        }
    }

    pub fn optional_artifacts(self) -> &'static [ArtifactKind] {
        match self {
            ComponentType::FetchApi => &[ArtifactKind::Inputs, ArtifactKind::Body],
            ComponentType::Basic | ComponentType::ComfyWorkflow => &[],
        }
    }

    /// Required followed by optional artifacts: the set tracked for change
    /// detection and sent to the remote service.
    pub fn relevant_artifacts(self) -> Vec<ArtifactKind> {
        let mut kinds = self.required_artifacts().to_vec();
        kinds.extend_from_slice(self.optional_artifacts());
        kinds
    }

    pub fn is_relevant(self, kind: ArtifactKind) -> bool {
        self.required_artifacts().contains(&kind) || self.optional_artifacts().contains(&kind)
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentType::Basic => write!(f, "basic"),
            ComponentType::ComfyWorkflow => write!(f, "comfy_workflow"),
            ComponentType::FetchApi => write!(f, "fetch_api"),
        }
    }
}

impl FromStr for ComponentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ComponentType::Basic),
            "comfy_workflow" => Ok(ComponentType::ComfyWorkflow),
            "fetch_api" => Ok(ComponentType::FetchApi),
            other => Err(CoreError::UnknownType {
                value: other.to_owned(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
