//! Invocation configuration.
//!
//! Settings are gathered from an optional TOML file ([`file`]) and from the
//! command line, layered with [`DeploySettings::overlay`], then validated once
//! into an immutable [`DeployConfig`] that the deploy flow reads from.

pub mod file;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::consts::{DEFAULT_BUILD_DIR, DEFAULT_REGION};
use crate::credentials::CredentialSource;
use crate::error::DeployError;
use crate::stack::OverrideSet;

pub use file::{ConfigFileError, find_config_path};

/// Unvalidated settings from one source. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeploySettings {
  pub access_key: Option<String>,
  pub secret_key: Option<String>,
  pub server_id: Option<String>,
  pub bucket_name: Option<String>,
  pub region: Option<String>,
  #[serde(default)]
  pub stack_names: Vec<String>,
  pub artifact_file: Option<PathBuf>,
  /// Build output directory used to locate the default artifact.
  pub build_dir: Option<PathBuf>,
  /// File name of the build output inside `build_dir`.
  pub final_name: Option<String>,
  #[serde(default)]
  pub stack_parameters: OverrideSet,
}

impl DeploySettings {
  /// Layer `top` over `self`, field by field.
  ///
  /// A non-empty stack list in `top` replaces this one. Parameters from `top`
  /// are inserted into this set, so keys that already exist keep their position.
  pub fn overlay(mut self, top: DeploySettings) -> DeploySettings {
    let mut stack_parameters = std::mem::take(&mut self.stack_parameters);
    stack_parameters.extend(top.stack_parameters);

    DeploySettings {
      access_key: top.access_key.or(self.access_key),
      secret_key: top.secret_key.or(self.secret_key),
      server_id: top.server_id.or(self.server_id),
      bucket_name: top.bucket_name.or(self.bucket_name),
      region: top.region.or(self.region),
      stack_names: if top.stack_names.is_empty() {
        self.stack_names
      } else {
        top.stack_names
      },
      artifact_file: top.artifact_file.or(self.artifact_file),
      build_dir: top.build_dir.or(self.build_dir),
      final_name: top.final_name.or(self.final_name),
      stack_parameters,
    }
  }

  /// Validate into a [`DeployConfig`].
  ///
  /// `credentials_path` is the credential store consulted for `server_id`.
  ///
  /// # Errors
  ///
  /// `DeployError::Configuration` if the bucket, the stack list, or the
  /// artifact location is missing.
  pub fn into_config(self, credentials_path: PathBuf) -> Result<DeployConfig, DeployError> {
    let bucket_name = self
      .bucket_name
      .filter(|b| !b.is_empty())
      .ok_or_else(|| DeployError::Configuration("bucket name is required".to_string()))?;

    if self.stack_names.is_empty() {
      return Err(DeployError::Configuration("at least one stack name is required".to_string()));
    }
    if self.stack_names.iter().any(|name| name.trim().is_empty()) {
      return Err(DeployError::Configuration("stack names must not be empty".to_string()));
    }

    let region = self
      .region
      .filter(|r| !r.is_empty())
      .unwrap_or_else(|| DEFAULT_REGION.to_string());

    let artifact_file = match (self.artifact_file, self.final_name) {
      (Some(path), _) => path,
      (None, Some(final_name)) => self
        .build_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_DIR))
        .join(final_name),
      (None, None) => {
        return Err(DeployError::Configuration(
          "artifact file not configured (set artifact_file or final_name)".to_string(),
        ));
      }
    };

    Ok(DeployConfig {
      credentials: CredentialSource {
        access_key: self.access_key,
        secret_key: self.secret_key,
        server_id: self.server_id,
        store_path: credentials_path,
      },
      bucket_name,
      region,
      stack_names: self.stack_names,
      artifact_file,
      stack_parameters: self.stack_parameters,
    })
  }
}

/// Validated configuration for one invocation. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
  credentials: CredentialSource,
  bucket_name: String,
  region: String,
  stack_names: Vec<String>,
  artifact_file: PathBuf,
  stack_parameters: OverrideSet,
}

impl DeployConfig {
  pub fn credentials(&self) -> &CredentialSource {
    &self.credentials
  }

  pub fn bucket_name(&self) -> &str {
    &self.bucket_name
  }

  pub fn region(&self) -> &str {
    &self.region
  }

  /// Stacks to update, in the order they were given.
  pub fn stack_names(&self) -> &[String] {
    &self.stack_names
  }

  pub fn artifact_file(&self) -> &Path {
    &self.artifact_file
  }

  /// Overrides applied identically to every stack.
  pub fn stack_parameters(&self) -> &OverrideSet {
    &self.stack_parameters
  }

  /// CloudFormation endpoint for the configured region.
  pub fn cloudformation_endpoint(&self) -> String {
    cloudformation_endpoint(&self.region)
  }
}

pub fn cloudformation_endpoint(region: &str) -> String {
  format!("https://cloudformation.{region}.amazonaws.com")
}
