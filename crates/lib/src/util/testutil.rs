//! Test utilities for cfdeploy-lib.
//!
//! [`FakeBackend`] implements both remote traits in memory and records every
//! call in order, so tests can assert on call counts and sequencing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::remote::{ObjectStore, RemoteError, RemoteErrorKind, StackService};
use crate::stack::{StackDescriptor, StackParameter, UpdateRequest};

/// A remote call as observed by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  PutObject { bucket: String, key: String },
  GetTemplate(String),
  DescribeStacks(String),
  UpdateStack(String),
}

#[derive(Debug, Default)]
pub struct FakeBackend {
  templates: HashMap<String, String>,
  stacks: Vec<StackDescriptor>,
  fail_upload: Option<RemoteErrorKind>,
  fail_template: HashMap<String, RemoteErrorKind>,
  fail_describe: HashMap<String, RemoteErrorKind>,
  fail_update: HashMap<String, RemoteErrorKind>,
  calls: Mutex<Vec<Call>>,
  uploads: Mutex<Vec<(String, String, PathBuf)>>,
  updates: Mutex<Vec<UpdateRequest>>,
}

impl FakeBackend {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_template(mut self, name: &str, body: &str) -> Self {
    self.templates.insert(name.to_string(), body.to_string());
    self
  }

  /// Add a describe-stacks match. Calling twice with one name yields two matches.
  pub fn with_stack(mut self, name: &str, params: &[(&str, &str)], capabilities: &[&str]) -> Self {
    self.stacks.push(StackDescriptor {
      name: name.to_string(),
      parameters: params.iter().map(|(k, v)| StackParameter::new(*k, *v)).collect(),
      capabilities: capabilities.iter().map(|c| c.to_string()).collect(),
    });
    self
  }

  /// Template plus descriptor for a stack that exists remotely.
  pub fn with_deployed_stack(self, name: &str, params: &[(&str, &str)], capabilities: &[&str]) -> Self {
    let body = format!("{{\"Description\": \"{name}\"}}");
    self.with_template(name, &body).with_stack(name, params, capabilities)
  }

  pub fn fail_upload(mut self, kind: RemoteErrorKind) -> Self {
    self.fail_upload = Some(kind);
    self
  }

  pub fn fail_template(mut self, name: &str, kind: RemoteErrorKind) -> Self {
    self.fail_template.insert(name.to_string(), kind);
    self
  }

  pub fn fail_describe(mut self, name: &str, kind: RemoteErrorKind) -> Self {
    self.fail_describe.insert(name.to_string(), kind);
    self
  }

  pub fn fail_update(mut self, name: &str, kind: RemoteErrorKind) -> Self {
    self.fail_update.insert(name.to_string(), kind);
    self
  }

  pub fn calls(&self) -> Vec<Call> {
    self.calls.lock().unwrap().clone()
  }

  pub fn uploads(&self) -> Vec<(String, String, PathBuf)> {
    self.uploads.lock().unwrap().clone()
  }

  pub fn updates(&self) -> Vec<UpdateRequest> {
    self.updates.lock().unwrap().clone()
  }

  /// Calls that touched `stack_name` in any way.
  pub fn calls_for(&self, stack_name: &str) -> usize {
    self
      .calls()
      .iter()
      .filter(|call| match call {
        Call::GetTemplate(name) | Call::DescribeStacks(name) | Call::UpdateStack(name) => name == stack_name,
        Call::PutObject { .. } => false,
      })
      .count()
  }

  fn record(&self, call: Call) {
    self.calls.lock().unwrap().push(call);
  }
}

fn injected(kind: RemoteErrorKind, what: &str) -> RemoteError {
  RemoteError::new(kind, format!("injected {what} failure"))
}

impl ObjectStore for FakeBackend {
  async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), RemoteError> {
    self.record(Call::PutObject {
      bucket: bucket.to_string(),
      key: key.to_string(),
    });
    if let Some(kind) = self.fail_upload {
      return Err(injected(kind, "upload"));
    }
    self
      .uploads
      .lock()
      .unwrap()
      .push((bucket.to_string(), key.to_string(), path.to_path_buf()));
    Ok(())
  }
}

impl StackService for FakeBackend {
  async fn get_template(&self, stack_name: &str) -> Result<Option<String>, RemoteError> {
    self.record(Call::GetTemplate(stack_name.to_string()));
    if let Some(kind) = self.fail_template.get(stack_name) {
      return Err(injected(*kind, "get-template"));
    }
    Ok(self.templates.get(stack_name).cloned())
  }

  async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackDescriptor>, RemoteError> {
    self.record(Call::DescribeStacks(stack_name.to_string()));
    if let Some(kind) = self.fail_describe.get(stack_name) {
      return Err(injected(*kind, "describe-stacks"));
    }
    Ok(self.stacks.iter().filter(|s| s.name == stack_name).cloned().collect())
  }

  async fn update_stack(&self, request: &UpdateRequest) -> Result<(), RemoteError> {
    self.record(Call::UpdateStack(request.stack_name.clone()));
    if let Some(kind) = self.fail_update.get(&request.stack_name) {
      return Err(injected(*kind, "update-stack"));
    }
    self.updates.lock().unwrap().push(request.clone());
    Ok(())
  }
}
