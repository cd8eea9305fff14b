//! CLI configuration.
//!
//! # Storage layout
//!
//! ```text
//! ~/.ecli/
//!   config.json    { "apiUrl": "...", "componentsDir": "..." (optional) }
//! <components_dir>/
//!   .ecli-state.json
//!   <component>/...
//! ```
//!
//! # API pattern
//!
//! Every function touching the filesystem has two forms:
//! - `fn_at(home: &Path, …)` — explicit home; used in tests with `TempDir`
//! - `fn(…)` — derives home from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{io_err, CoreError};

pub const DEFAULT_API_URL: &str = "https://cycle-16-dev-api-openstudio.emprops.ai";

/// Directory searched for components when the config file names none.
pub const DEFAULT_COMPONENTS_DIR: &str = "Components";

/// Name of the sync state file inside the components root.
pub const STATE_FILE_NAME: &str = ".ecli-state.json";

/// On-disk config payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    pub api_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            components_dir: None,
        }
    }
}

/// Resolved configuration passed down to every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the remote component service, without trailing slash.
    pub api_url: String,
    /// Absolute path of the directory holding one sub-directory per component.
    pub components_dir: PathBuf,
}

impl Config {
    pub fn new(api_url: impl Into<String>, components_dir: impl Into<PathBuf>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            components_dir: components_dir.into(),
        }
    }

    /// Resolve a config file against the working directory.
    pub fn from_file(file: ConfigFile, cwd: &Path) -> Self {
        let components_dir = match file.components_dir {
            Some(dir) if dir.is_absolute() => dir,
            Some(dir) => cwd.join(dir),
            None => cwd.join(DEFAULT_COMPONENTS_DIR),
        };
        Self::new(file.api_url, components_dir)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_components_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.components_dir = dir.into();
        self
    }

    /// `<components_dir>/.ecli-state.json`
    pub fn state_path(&self) -> PathBuf {
        self.components_dir.join(STATE_FILE_NAME)
    }

    /// `<components_dir>/<name>/`
    pub fn component_dir(&self, name: &str) -> PathBuf {
        self.components_dir.join(name)
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `<home>/.ecli/config.json` — pure, no I/O.
pub fn config_path_at(home: &Path) -> PathBuf {
    home.join(".ecli").join("config.json")
}

/// `config_path_at` convenience wrapper.
pub fn config_path() -> Result<PathBuf, CoreError> {
    Ok(config_path_at(&home()?))
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Read the raw config file.
///
/// Returns `CoreError::ConfigNotFound` if absent,
/// `CoreError::Parse` (with path context) if malformed.
pub fn load_file_at(home: &Path) -> Result<ConfigFile, CoreError> {
    let path = config_path_at(home);
    if !path.exists() {
        return Err(CoreError::ConfigNotFound { path });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    serde_json::from_str(&contents).map_err(|source| CoreError::Parse { path, source })
}

/// Load the config file and resolve it against `cwd`.
pub fn load_at(home: &Path, cwd: &Path) -> Result<Config, CoreError> {
    Ok(Config::from_file(load_file_at(home)?, cwd))
}

/// `load_at` convenience wrapper.
pub fn load(cwd: &Path) -> Result<Config, CoreError> {
    load_at(&home()?, cwd)
}

/// Atomically write the config file.
///
/// Write flow: serialize → `config.json.tmp` sibling → `rename`.
pub fn save_at(home: &Path, file: &ConfigFile) -> Result<(), CoreError> {
    let path = config_path_at(home);
    let Some(dir) = path.parent() else {
        return Err(io_err(path, std::io::Error::other("invalid config path")));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(file)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}

/// Write a default config unless one exists.
///
/// Idempotent: an existing config is loaded and returned unchanged. The
/// boolean is `true` when a new file was created.
pub fn init_at(home: &Path) -> Result<(ConfigFile, bool), CoreError> {
    if config_path_at(home).exists() {
        return Ok((load_file_at(home)?, false));
    }
    let file = ConfigFile::default();
    save_at(home, &file)?;
    Ok((file, true))
}

/// `init_at` convenience wrapper.
pub fn init() -> Result<(ConfigFile, bool), CoreError> {
    init_at(&home()?)
}

pub fn home() -> Result<PathBuf, CoreError> {
    dirs::home_dir().ok_or(CoreError::HomeNotFound)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_path_is_correct() {
        let home = TempDir::new().unwrap();
        assert!(config_path_at(home.path()).ends_with(".ecli/config.json"));
    }

    #[test]
    fn load_missing_config_returns_not_found() {
        let home = TempDir::new().unwrap();
        let err = load_at(home.path(), Path::new("/work")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigNotFound { .. }));
        assert!(err.to_string().contains("ecli init"));
    }

    #[test]
    fn init_then_load_uses_default_components_dir() {
        let home = TempDir::new().unwrap();
        let (_, created) = init_at(home.path()).unwrap();
        assert!(created);

        let config = load_at(home.path(), Path::new("/work")).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.components_dir, PathBuf::from("/work/Components"));
        assert_eq!(
            config.state_path(),
            PathBuf::from("/work/Components/.ecli-state.json")
        );
    }

    #[test]
    fn init_is_idempotent() {
        let home = TempDir::new().unwrap();
        let custom = ConfigFile {
            api_url: "http://localhost:9000".to_string(),
            components_dir: None,
        };
        save_at(home.path(), &custom).unwrap();

        let (file, created) = init_at(home.path()).unwrap();
        assert!(!created);
        assert_eq!(file, custom);
    }

    #[test]
    fn file_uses_camel_case_keys() {
        let home = TempDir::new().unwrap();
        std::fs::create_dir_all(home.path().join(".ecli")).unwrap();
        std::fs::write(
            config_path_at(home.path()),
            r#"{"apiUrl":"http://api.test/","componentsDir":"comps"}"#,
        )
        .unwrap();

        let config = load_at(home.path(), Path::new("/repo")).unwrap();
        assert_eq!(config.api_url, "http://api.test");
        assert_eq!(config.components_dir, PathBuf::from("/repo/comps"));
    }

    #[test]
    fn save_cleans_up_tmp() {
        let home = TempDir::new().unwrap();
        save_at(home.path(), &ConfigFile::default()).unwrap();
        let tmp = config_path_at(home.path()).with_extension("json.tmp");
        assert!(!tmp.exists(), ".tmp must be gone after successful save");
    }

    #[test]
    fn overrides_replace_fields() {
        let config = Config::new("http://a", "/x")
            .with_api_url("http://b/")
            .with_components_dir("/y");
        assert_eq!(config.api_url, "http://b");
        assert_eq!(config.component_dir("flux"), PathBuf::from("/y/flux"));
    }
}
