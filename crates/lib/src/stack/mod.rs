//! Stack types and the read / update steps of a deploy.
//!
//! - [`fetch_template`] and [`fetch_stack`] read a stack's current state
//! - [`merge_parameters`] overlays caller overrides onto its parameters
//! - [`update_stack`] submits the update request

pub mod merge;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{DeployError, RemoteResultExt};
use crate::remote::StackService;

pub use merge::merge_parameters;

/// Caller-supplied replacement values, keyed by parameter name.
///
/// Iteration order is insertion order and decides the order overrides are
/// appended to a merged parameter list.
pub type OverrideSet = IndexMap<String, String>;

/// A single stack parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackParameter {
  pub key: String,
  pub value: String,
}

impl StackParameter {
  pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      key: key.into(),
      value: value.into(),
    }
  }
}

/// Snapshot of a remote stack taken when it was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescriptor {
  pub name: String,
  pub parameters: Vec<StackParameter>,
  /// Elevated permissions the stack was created with, e.g. `CAPABILITY_IAM`.
  pub capabilities: Vec<String>,
}

/// Everything the stack service needs to update one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
  pub stack_name: String,
  /// The template exactly as fetched; it is never modified.
  pub template_body: String,
  pub parameters: Vec<StackParameter>,
  /// Copied verbatim from the descriptor.
  pub capabilities: Vec<String>,
}

impl UpdateRequest {
  /// Build the update for a stack from what was read and the merged parameters.
  pub fn new(stack_name: &str, template_body: String, stack: StackDescriptor, overrides: &OverrideSet) -> Self {
    Self {
      stack_name: stack_name.to_string(),
      template_body,
      parameters: merge_parameters(stack.parameters, overrides),
      capabilities: stack.capabilities,
    }
  }
}

/// Fetch the template body of `stack_name`.
///
/// The body is opaque; an absent or empty body is treated as not found.
pub async fn fetch_template<S: StackService>(service: &S, stack_name: &str) -> Result<String, DeployError> {
  const FAILED: &str = "could not get CloudFormation stack template";

  info!(stack = %stack_name, "getting stack template");
  match service.get_template(stack_name).await.or_remote(FAILED)? {
    Some(body) if !body.is_empty() => Ok(body),
    _ => Err(DeployError::NotFound(format!("{FAILED} for '{stack_name}'"))),
  }
}

/// Fetch the descriptor of `stack_name`.
///
/// Only the first match is used if the service ever returns several.
pub async fn fetch_stack<S: StackService>(service: &S, stack_name: &str) -> Result<StackDescriptor, DeployError> {
  const FAILED: &str = "could not get CloudFormation stack details";

  info!(stack = %stack_name, "getting stack details");
  let stacks = service.describe_stacks(stack_name).await.or_remote(FAILED)?;
  if stacks.len() > 1 {
    warn!(stack = %stack_name, matches = stacks.len(), "multiple stacks matched, using the first");
  }

  stacks
    .into_iter()
    .next()
    .ok_or_else(|| DeployError::NotFound(format!("{FAILED} for '{stack_name}'")))
}

/// Submit `request`. Completion of the update itself is not awaited.
pub async fn update_stack<S: StackService>(service: &S, request: &UpdateRequest) -> Result<(), DeployError> {
  info!(stack = %request.stack_name, parameters = request.parameters.len(), "updating stack");
  service
    .update_stack(request)
    .await
    .or_remote("could not update CloudFormation stack")
}
