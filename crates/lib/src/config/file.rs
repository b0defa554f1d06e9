//! Config file discovery and loading.
//!
//! # File Format
//!
//! ```toml
//! bucket_name = "my-bucket"
//! region = "eu-west-1"
//! stack_names = ["api", "worker"]
//! artifact_file = "target/lambda/app.zip"
//! server_id = "deploy-prod"
//!
//! [stack_parameters]
//! ArtifactKey = "app.zip"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use super::DeploySettings;
use crate::consts::CONFIG_FILENAME;

/// Errors that can occur when loading a config file.
#[derive(Debug, Error)]
pub enum ConfigFileError {
  /// An explicitly requested config file does not exist.
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  /// Failed to read the config file.
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The config file is not valid TOML or has unknown keys.
  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// Find the config file to use.
///
/// Priority order:
/// 1. Explicit path, which must exist
/// 2. `./cfdeploy.toml` in the current directory, if present
///
/// Returns `Ok(None)` when there is no config file; everything then comes
/// from the command line.
pub fn find_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigFileError> {
  if let Some(path) = explicit {
    if path.is_file() {
      return Ok(Some(path.to_path_buf()));
    }
    return Err(ConfigFileError::NotFound(path.to_path_buf()));
  }

  let cwd_config = PathBuf::from(CONFIG_FILENAME);
  if cwd_config.is_file() {
    return Ok(Some(cwd_config));
  }

  Ok(None)
}

impl DeploySettings {
  /// Load settings from a TOML config file.
  pub fn load(path: &Path) -> Result<Self, ConfigFileError> {
    debug!(path = %path.display(), "loading config file");
    let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

#[cfg(test)]
mod tests {
  use serial_test::serial;
  use tempfile::TempDir;

  use super::*;

  #[test]
  fn explicit_path_found() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deploy.toml");
    fs::write(&path, "").unwrap();

    assert_eq!(find_config_path(Some(&path)).unwrap(), Some(path));
  }

  #[test]
  fn explicit_path_not_found() {
    let err = find_config_path(Some(Path::new("/nonexistent/deploy.toml"))).unwrap_err();
    assert!(matches!(err, ConfigFileError::NotFound(_)));
  }

  #[test]
  #[serial]
  fn cwd_config_is_optional() {
    let temp = TempDir::new().unwrap();
    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp.path()).unwrap();

    let missing = find_config_path(None);
    fs::write(temp.path().join(CONFIG_FILENAME), "").unwrap();
    let found = find_config_path(None);

    std::env::set_current_dir(original_dir).unwrap();

    assert_eq!(missing.unwrap(), None);
    assert_eq!(found.unwrap(), Some(PathBuf::from(CONFIG_FILENAME)));
  }

  #[test]
  fn loads_all_keys_in_order() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deploy.toml");
    fs::write(
      &path,
      r#"
        bucket_name = "my-bucket"
        region = "eu-west-1"
        stack_names = ["api", "worker"]
        artifact_file = "dist/app.zip"
        server_id = "deploy-prod"

        [stack_parameters]
        Zeta = "1"
        Alpha = "2"
        Mid = "3"
      "#,
    )
    .unwrap();

    let settings = DeploySettings::load(&path).unwrap();
    assert_eq!(settings.bucket_name.as_deref(), Some("my-bucket"));
    assert_eq!(settings.region.as_deref(), Some("eu-west-1"));
    assert_eq!(settings.stack_names, vec!["api", "worker"]);
    assert_eq!(settings.artifact_file, Some(PathBuf::from("dist/app.zip")));
    assert_eq!(settings.server_id.as_deref(), Some("deploy-prod"));
    let keys: Vec<_> = settings.stack_parameters.keys().cloned().collect();
    assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);
  }

  #[test]
  fn unknown_keys_are_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("deploy.toml");
    fs::write(&path, "bucket = \"typo\"\n").unwrap();

    let err = DeploySettings::load(&path).unwrap_err();
    assert!(matches!(err, ConfigFileError::Parse { .. }));
  }
}
