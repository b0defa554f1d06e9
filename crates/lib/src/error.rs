//! Error taxonomy for a deploy invocation.
//!
//! Every failure is one of five kinds. Remote failures keep the service/client
//! split only for diagnostics: both abort the invocation and neither is retried.

use std::fmt;

use thiserror::Error;

use crate::remote::{RemoteError, RemoteErrorKind};

/// Coarse classification of a [`DeployError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
  Configuration,
  Validation,
  NotFound,
  RemoteService,
  RemoteClient,
}

impl ErrorKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Configuration => "configuration",
      Self::Validation => "validation",
      Self::NotFound => "not-found",
      Self::RemoteService => "remote-service",
      Self::RemoteClient => "remote-client",
    }
  }
}

impl fmt::Display for ErrorKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Errors that abort a deploy invocation.
#[derive(Debug, Error)]
pub enum DeployError {
  /// Missing credentials, missing required inputs, unreadable config files.
  #[error("configuration error: {0}")]
  Configuration(String),

  /// The local artifact failed validation.
  #[error("validation error: {0}")]
  Validation(String),

  /// A remote lookup returned nothing.
  #[error("[NULL] {0}")]
  NotFound(String),

  /// The backend rejected the request.
  #[error("[SERVICE] {message}")]
  RemoteService {
    message: String,
    #[source]
    source: RemoteError,
  },

  /// Transport or client-side failure before the backend answered.
  #[error("[CLIENT] {message}")]
  RemoteClient {
    message: String,
    #[source]
    source: RemoteError,
  },
}

impl DeployError {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::Configuration(_) => ErrorKind::Configuration,
      Self::Validation(_) => ErrorKind::Validation,
      Self::NotFound(_) => ErrorKind::NotFound,
      Self::RemoteService { .. } => ErrorKind::RemoteService,
      Self::RemoteClient { .. } => ErrorKind::RemoteClient,
    }
  }

  /// Attach an operator-facing message to a classified remote failure.
  pub fn remote(message: impl Into<String>, source: RemoteError) -> Self {
    let message = message.into();
    match source.kind() {
      RemoteErrorKind::Service => Self::RemoteService { message, source },
      RemoteErrorKind::Client => Self::RemoteClient { message, source },
    }
  }
}

/// Extension for turning adapter results into [`DeployError`]s at the call site.
pub trait RemoteResultExt<T> {
  fn or_remote(self, message: &str) -> Result<T, DeployError>;
}

impl<T> RemoteResultExt<T> for Result<T, RemoteError> {
  fn or_remote(self, message: &str) -> Result<T, DeployError> {
    self.map_err(|e| DeployError::remote(message, e))
  }
}
