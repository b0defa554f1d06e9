use std::path::PathBuf;

use crate::consts::{APP_NAME, CREDENTIALS_ENV, CREDENTIALS_FILENAME};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE").map(PathBuf::from).unwrap_or_default()
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME").map(PathBuf::from).unwrap_or_default()
}

/// Returns the directory for configuration files for the application
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
  std::env::var("APPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Roaming"))
    .join(APP_NAME)
}

/// Returns the directory for configuration files for the application
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
  let config_home = std::env::var("XDG_CONFIG_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".config"));
  config_home.join(APP_NAME)
}

/// Location of the credential store.
///
/// `CFDEPLOY_CREDENTIALS` wins over the default `<config_dir>/credentials.toml`.
pub fn credentials_path() -> PathBuf {
  match std::env::var(CREDENTIALS_ENV) {
    Ok(path) if !path.is_empty() => PathBuf::from(path),
    _ => config_dir().join(CREDENTIALS_FILENAME),
  }
}
