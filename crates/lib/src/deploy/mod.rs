//! Deploy orchestration.
//!
//! One invocation moves through these phases, strictly in sequence:
//!
//! ```text
//! ValidatingArtifact -> UploadingArtifact
//!   -> for each stack: ReadingTemplate -> ReadingStack -> MergingParameters -> UpdatingStack
//!   -> Done
//! ```
//!
//! The first failure in any phase aborts the invocation. Stacks after the
//! failing one are never touched and stacks already updated are not rolled back.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::artifact::{ArtifactReference, upload_artifact};
use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::remote::{ObjectStore, StackService, aws};
use crate::stack::{UpdateRequest, fetch_stack, fetch_template, update_stack};

/// Options for a deploy invocation.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
  /// Read stacks and compute merged parameters, but upload and update nothing.
  pub dry_run: bool,
}

/// A step of the deploy state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployPhase {
  ValidatingArtifact,
  UploadingArtifact,
  ReadingTemplate,
  ReadingStack,
  MergingParameters,
  UpdatingStack,
  Done,
}

impl fmt::Display for DeployPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::ValidatingArtifact => "validating-artifact",
      Self::UploadingArtifact => "uploading-artifact",
      Self::ReadingTemplate => "reading-template",
      Self::ReadingStack => "reading-stack",
      Self::MergingParameters => "merging-parameters",
      Self::UpdatingStack => "updating-stack",
      Self::Done => "done",
    };
    f.write_str(name)
  }
}

/// Summary of a successful invocation.
#[derive(Debug, Clone)]
pub struct DeployReport {
  pub bucket: String,
  /// Storage key of the artifact.
  pub key: String,
  /// Stacks whose update was accepted (or, in a dry run, would be submitted), in order.
  pub stacks: Vec<String>,
  /// Update requests that were computed for a dry run. Empty otherwise.
  pub planned: Vec<UpdateRequest>,
  pub dry_run: bool,
  pub duration: Duration,
}

/// A deploy whose artifact has been validated.
#[derive(Debug)]
pub struct Deployment<'a> {
  config: &'a DeployConfig,
  artifact: ArtifactReference,
}

impl<'a> Deployment<'a> {
  /// Validate the artifact named by `config`. No remote call is made.
  pub fn prepare(config: &'a DeployConfig) -> Result<Self, DeployError> {
    debug!(phase = %DeployPhase::ValidatingArtifact, path = %config.artifact_file().display());
    let artifact = ArtifactReference::new(config.artifact_file())?;
    info!(bucket = %config.bucket_name(), artifact = %artifact.key(), "artifact ready");
    Ok(Self { config, artifact })
  }

  /// Upload the artifact, then read, merge and update every stack in order.
  pub async fn execute<O, S>(self, options: &DeployOptions, store: &O, stacks: &S) -> Result<DeployReport, DeployError>
  where
    O: ObjectStore,
    S: StackService,
  {
    let start = Instant::now();
    let config = self.config;
    let bucket = config.bucket_name();

    debug!(phase = %DeployPhase::UploadingArtifact, dry_run = options.dry_run);
    let key = if options.dry_run {
      info!(bucket = %bucket, key = %self.artifact.key(), "dry run, skipping upload");
      self.artifact.key().to_string()
    } else {
      upload_artifact(store, bucket, &self.artifact).await?
    };

    let mut updated = Vec::with_capacity(config.stack_names().len());
    let mut planned = Vec::new();

    for stack_name in config.stack_names() {
      info!(stack = %stack_name, "processing stack");
      let request = read_and_merge(stacks, stack_name, config).await?;

      if options.dry_run {
        for param in &request.parameters {
          info!(stack = %stack_name, key = %param.key, value = %param.value, "would set parameter");
        }
        info!(stack = %stack_name, capabilities = ?request.capabilities, "dry run, skipping update");
        planned.push(request);
      } else {
        debug!(phase = %DeployPhase::UpdatingStack, stack = %stack_name);
        update_stack(stacks, &request).await?;
        info!(stack = %stack_name, "stack is now updating");
      }
      updated.push(stack_name.clone());
    }

    debug!(phase = %DeployPhase::Done);
    if options.dry_run {
      info!(stacks = updated.len(), "dry run complete");
    } else {
      info!(stacks = updated.len(), "all stacks have been updated");
    }

    Ok(DeployReport {
      bucket: bucket.to_string(),
      key,
      stacks: updated,
      planned,
      dry_run: options.dry_run,
      duration: start.elapsed(),
    })
  }
}

async fn read_and_merge<S: StackService>(
  service: &S,
  stack_name: &str,
  config: &DeployConfig,
) -> Result<UpdateRequest, DeployError> {
  debug!(phase = %DeployPhase::ReadingTemplate, stack = %stack_name);
  let template_body = fetch_template(service, stack_name).await?;

  debug!(phase = %DeployPhase::ReadingStack, stack = %stack_name);
  let stack = fetch_stack(service, stack_name).await?;

  debug!(phase = %DeployPhase::MergingParameters, stack = %stack_name, overrides = config.stack_parameters().len());
  Ok(UpdateRequest::new(stack_name, template_body, stack, config.stack_parameters()))
}

/// Run a deploy against the given collaborators.
pub async fn deploy<O, S>(
  config: &DeployConfig,
  options: &DeployOptions,
  store: &O,
  stacks: &S,
) -> Result<DeployReport, DeployError>
where
  O: ObjectStore,
  S: StackService,
{
  Deployment::prepare(config)?.execute(options, store, stacks).await
}

/// Run a deploy against AWS.
///
/// The artifact is validated before credentials are resolved or any client is
/// built, so a missing artifact never reaches the network.
pub async fn run(config: &DeployConfig, options: &DeployOptions) -> Result<DeployReport, DeployError> {
  let deployment = Deployment::prepare(config)?;
  let credentials = config.credentials().resolve()?;
  let (store, stacks) = aws::connect(config, &credentials);
  deployment.execute(options, &store, &stacks).await
}
