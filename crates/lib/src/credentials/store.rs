//! Credential store: named server entries holding a username/password pair.
//!
//! # File Format
//!
//! ```toml
//! [servers.deploy-prod]
//! username = "AKIAEXAMPLE"
//! password = "secret"
//! ```
//!
//! For AWS the username is the access key id and the password the secret key.
//! Values are stored in plain text; there is no decryption step.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// One named entry in the store.
#[derive(Clone, Default, Deserialize)]
pub struct ServerEntry {
  #[serde(default)]
  pub username: Option<String>,
  #[serde(default)]
  pub password: Option<String>,
}

impl fmt::Debug for ServerEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServerEntry")
      .field("username", &self.username)
      .field("password", &self.password.as_ref().map(|_| "<redacted>"))
      .finish()
  }
}

/// Credential entries keyed by server id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialStore {
  #[serde(default)]
  servers: BTreeMap<String, ServerEntry>,
}

/// Errors that can occur when loading the credential store.
#[derive(Debug, Error)]
pub enum CredentialStoreError {
  /// Failed to read the store file.
  #[error("failed to read credential store '{path}': {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The store file is not valid TOML or has the wrong shape.
  #[error("failed to parse credential store '{path}': {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

impl CredentialStore {
  /// Load the store at `path`. A missing file is an empty store.
  pub fn load(path: &Path) -> Result<Self, CredentialStoreError> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %path.display(), "credential store not found, using empty store");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(CredentialStoreError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    toml::from_str(&content).map_err(|source| CredentialStoreError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn get(&self, server_id: &str) -> Option<&ServerEntry> {
    self.servers.get(server_id)
  }

  /// Insert or replace an entry.
  pub fn insert(&mut self, server_id: impl Into<String>, entry: ServerEntry) {
    self.servers.insert(server_id.into(), entry);
  }
}
