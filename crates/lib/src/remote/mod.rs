//! Remote collaborators: object storage and the stack service.
//!
//! The deploy flow only talks to these traits. [`aws`] provides the production
//! implementations on top of the AWS SDK; tests substitute in-memory fakes.

pub mod aws;

use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::path::Path;

use crate::stack::{StackDescriptor, UpdateRequest};

pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Whether the backend answered with a rejection or the request never completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
  Service,
  Client,
}

/// A classified failure from a remote call.
///
/// Carries no operator message of its own; the caller attaches one when it
/// converts this into a [`DeployError`](crate::DeployError).
#[derive(Debug)]
pub struct RemoteError {
  kind: RemoteErrorKind,
  source: BoxError,
}

impl RemoteError {
  pub fn new(kind: RemoteErrorKind, source: impl Into<BoxError>) -> Self {
    Self {
      kind,
      source: source.into(),
    }
  }

  pub fn service(source: impl Into<BoxError>) -> Self {
    Self::new(RemoteErrorKind::Service, source)
  }

  pub fn client(source: impl Into<BoxError>) -> Self {
    Self::new(RemoteErrorKind::Client, source)
  }

  pub fn kind(&self) -> RemoteErrorKind {
    self.kind
  }
}

impl fmt::Display for RemoteError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(&self.source, f)
  }
}

impl StdError for RemoteError {
  fn source(&self) -> Option<&(dyn StdError + 'static)> {
    self.source.source()
  }
}

/// Object storage that accepts one local file per call.
pub trait ObjectStore {
  /// Create or overwrite `bucket/key` with the contents of `path`.
  fn put_object(&self, bucket: &str, key: &str, path: &Path) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// The infrastructure-stack service.
pub trait StackService {
  /// Current template body of a stack. `None` when the service returned no body.
  fn get_template(&self, stack_name: &str) -> impl Future<Output = Result<Option<String>, RemoteError>> + Send;

  /// Every stack the service returns for `stack_name`. Normally exactly one.
  fn describe_stacks(&self, stack_name: &str)
  -> impl Future<Output = Result<Vec<StackDescriptor>, RemoteError>> + Send;

  /// Submit an update. Returns once the service accepted the request.
  fn update_stack(&self, request: &UpdateRequest) -> impl Future<Output = Result<(), RemoteError>> + Send;
}
