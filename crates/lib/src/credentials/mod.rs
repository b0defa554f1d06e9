//! Credential resolution.
//!
//! Credentials come from explicit configuration or from a named entry in the
//! credential store (see [`store`]). They are resolved once per invocation and
//! only ever held in memory.

pub mod store;

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::error::DeployError;

pub use store::{CredentialStore, CredentialStoreError, ServerEntry};

/// An access key / secret key pair.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
  access_key: String,
  secret_key: String,
}

impl Credentials {
  pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
    Self {
      access_key: access_key.into(),
      secret_key: secret_key.into(),
    }
  }

  pub fn access_key(&self) -> &str {
    &self.access_key
  }

  pub fn secret_key(&self) -> &str {
    &self.secret_key
  }
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("access_key", &self.access_key)
      .field("secret_key", &"<redacted>")
      .finish()
  }
}

/// Where credentials for an invocation come from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSource {
  pub access_key: Option<String>,
  pub secret_key: Option<String>,
  pub server_id: Option<String>,
  /// Credential store file, read only when a server id has to be looked up.
  pub store_path: PathBuf,
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.is_empty())
}

impl CredentialSource {
  /// Resolve credentials, loading the store from `store_path` only if needed.
  pub fn resolve(&self) -> Result<Credentials, DeployError> {
    if let Some(credentials) = self.explicit() {
      return Ok(credentials);
    }
    if self.server_id.is_none() {
      return self.resolve_with(&CredentialStore::default());
    }

    let store = CredentialStore::load(&self.store_path).map_err(|e| DeployError::Configuration(e.to_string()))?;
    self.resolve_with(&store)
  }

  /// Resolve credentials against an already loaded store.
  ///
  /// Explicit key and secret win when both are non-empty. Otherwise the named
  /// server entry, trimmed of surrounding whitespace, is used if it exists.
  ///
  /// # Errors
  ///
  /// `DeployError::Configuration` if key or secret is still missing or empty.
  pub fn resolve_with(&self, store: &CredentialStore) -> Result<Credentials, DeployError> {
    if let Some(credentials) = self.explicit() {
      return Ok(credentials);
    }

    let mut access_key = self.access_key.clone();
    let mut secret_key = self.secret_key.clone();

    if let Some(server_id) = &self.server_id {
      match store.get(server_id) {
        Some(entry) => {
          debug!(server_id = %server_id, "using credentials from credential store");
          access_key = entry.username.as_deref().map(|s| s.trim().to_string());
          secret_key = entry.password.as_deref().map(|s| s.trim().to_string());
        }
        None => debug!(server_id = %server_id, "server id not found in credential store"),
      }
    }

    match (non_empty(access_key.as_deref()), non_empty(secret_key.as_deref())) {
      (Some(key), Some(secret)) => Ok(Credentials::new(key, secret)),
      _ => Err(DeployError::Configuration(
        "missing either access key or secret key".to_string(),
      )),
    }
  }

  fn explicit(&self) -> Option<Credentials> {
    match (non_empty(self.access_key.as_deref()), non_empty(self.secret_key.as_deref())) {
      (Some(key), Some(secret)) => Some(Credentials::new(key, secret)),
      _ => None,
    }
  }
}
