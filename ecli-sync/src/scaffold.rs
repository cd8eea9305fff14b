//! Component directory scaffolding and removal.
//!
//! [`scaffold`] creates `<components_dir>/<name>/` with a starter file for
//! every artifact the type requires, plus an empty `ref/` directory for
//! reference assets. [`remove`] deletes a component directory.

use std::path::{Path, PathBuf};

use ecli_core::{ArtifactKind, ComponentName, ComponentType, CoreError};

use crate::error::{io_err, SyncError};

/// Files and directory written by [`scaffold`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scaffolded {
    pub dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Create the directory for a new component.
///
/// Fails if the directory already exists; nothing is overwritten.
pub fn scaffold(
    components_dir: &Path,
    name: &ComponentName,
    ty: ComponentType,
) -> Result<Scaffolded, SyncError> {
    let dir = components_dir.join(name.as_str());
    if dir.exists() {
        return Err(SyncError::ComponentExists {
            name: name.to_string(),
            dir,
        });
    }
    std::fs::create_dir_all(dir.join("ref")).map_err(|e| io_err(&dir, e))?;

    let mut files = Vec::new();
    for kind in ty.required_artifacts() {
        let path = dir.join(kind.file_name());
        std::fs::write(&path, template(*kind)).map_err(|e| io_err(&path, e))?;
        files.push(path);
    }
    Ok(Scaffolded { dir, files })
}

/// Delete the directory of an existing component and everything in it.
///
/// The remote copy and any sync record are left alone.
pub fn remove(components_dir: &Path, name: &ComponentName) -> Result<PathBuf, SyncError> {
    if !name.is_valid() {
        return Err(CoreError::InvalidName {
            name: name.to_string(),
        }
        .into());
    }
    let dir = components_dir.join(name.as_str());
    if !dir.is_dir() {
        return Err(SyncError::UnknownComponent {
            name: name.to_string(),
            dir: components_dir.to_path_buf(),
        });
    }
    std::fs::remove_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
    tracing::info!(component = %name, "removed component directory");
    Ok(dir)
}

fn template(kind: ArtifactKind) -> &'static str {
    match kind {
        ArtifactKind::Form => "{\n  \"main\": [],\n  \"advanced\": []\n}\n",
        ArtifactKind::Inputs => "[]\n",
        ArtifactKind::Workflow => "{\n  \"nodes\": {},\n  \"output_node_id\": \"\"\n}\n",
        ArtifactKind::Test | ArtifactKind::Body => "{}\n",
        ArtifactKind::Api => concat!(
            "{\n",
            "  \"url\": \"https://example.com/api\",\n",
            "  \"method\": \"POST\",\n",
            "  \"headers\": {},\n",
            "  \"successResponseCode\": [200],\n",
            "  \"fetchType\": \"wait\",\n",
            "  \"wait\": { \"outputExprJq\": \".\" }\n",
            "}\n",
        ),
        ArtifactKind::Credits => "function computeCost(context) {\n  return { cost: 1 };\n}\n",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecli_schema::validate_component;
    use tempfile::TempDir;

    #[test]
    fn scaffolded_components_validate() {
        let root = TempDir::new().unwrap();
        for (i, ty) in ComponentType::all().iter().enumerate() {
            let name = ComponentName::from(format!("new-{i}"));
            let out = scaffold(root.path(), &name, *ty).unwrap();
            assert!(out.dir.join("ref").is_dir());
            assert_eq!(out.files.len(), ty.required_artifacts().len());
            validate_component(&out.dir, &name, *ty).expect("scaffold must validate");
        }
    }

    #[test]
    fn existing_component_is_not_overwritten() {
        let root = TempDir::new().unwrap();
        let name = ComponentName::from("taken");
        std::fs::create_dir(root.path().join("taken")).unwrap();
        let err = scaffold(root.path(), &name, ComponentType::Basic).unwrap_err();
        assert!(matches!(err, SyncError::ComponentExists { .. }));
    }

    #[test]
    fn remove_deletes_the_whole_directory() {
        let root = TempDir::new().unwrap();
        let name = ComponentName::from("old");
        let out = scaffold(root.path(), &name, ComponentType::FetchApi).unwrap();
        std::fs::write(out.dir.join("ref").join("sample.png"), b"png").unwrap();

        assert_eq!(remove(root.path(), &name).unwrap(), out.dir);
        assert!(!out.dir.exists());
        assert!(root.path().is_dir());
    }

    #[test]
    fn remove_rejects_missing_and_invalid_names() {
        let root = TempDir::new().unwrap();
        let missing = remove(root.path(), &ComponentName::from("ghost")).unwrap_err();
        assert!(matches!(missing, SyncError::UnknownComponent { .. }));

        std::fs::create_dir(root.path().join("keep")).unwrap();
        let inner = root.path().join("inner");
        std::fs::create_dir(&inner).unwrap();
        let escape = remove(&inner, &ComponentName::from("../keep")).unwrap_err();
        assert!(matches!(escape, SyncError::Core(CoreError::InvalidName { .. })));
        assert!(root.path().join("keep").is_dir());
    }
}
