//! AWS SDK implementations of the remote traits.
//!
//! Both clients are built from static credentials and an explicit region, with
//! the SDK's retry policy disabled: a failed call fails the invocation.

use std::error::Error as StdError;
use std::fmt::Debug;
use std::path::Path;

use aws_sdk_cloudformation as cloudformation;
use aws_sdk_cloudformation::types::{Capability, Parameter, Stack};
use aws_sdk_s3 as s3;
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;

use super::{ObjectStore, RemoteError, RemoteErrorKind, StackService};
use crate::config::DeployConfig;
use crate::consts::APP_NAME;
use crate::credentials::Credentials;
use crate::stack::{StackDescriptor, StackParameter, UpdateRequest};

/// Classify an SDK failure.
///
/// A response from the service is a service error; everything else (request
/// construction, dispatch, timeout, unreadable response) is a client error.
pub fn classify<E, R>(err: SdkError<E, R>) -> RemoteError
where
  E: StdError + 'static,
  R: Debug,
{
  let kind = match &err {
    SdkError::ServiceError(_) => RemoteErrorKind::Service,
    _ => RemoteErrorKind::Client,
  };
  RemoteError::new(kind, DisplayErrorContext(&err).to_string())
}

/// Uploads artifacts with `PutObject`.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
  client: s3::Client,
}

impl S3ObjectStore {
  pub fn new(credentials: &Credentials, region: &str) -> Self {
    let config = s3::Config::builder()
      .behavior_version(s3::config::BehaviorVersion::latest())
      .region(s3::config::Region::new(region.to_string()))
      .credentials_provider(s3::config::Credentials::new(
        credentials.access_key(),
        credentials.secret_key(),
        None,
        None,
        APP_NAME,
      ))
      .retry_config(s3::config::retry::RetryConfig::disabled())
      .build();

    Self {
      client: s3::Client::from_conf(config),
    }
  }
}

impl ObjectStore for S3ObjectStore {
  async fn put_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), RemoteError> {
    let body = ByteStream::from_path(path).await.map_err(RemoteError::client)?;
    let output = self
      .client
      .put_object()
      .bucket(bucket)
      .key(key)
      .body(body)
      .send()
      .await
      .map_err(classify)?;
    debug!(bucket = %bucket, key = %key, etag = ?output.e_tag(), "object stored");
    Ok(())
  }
}

/// Reads and updates stacks through the CloudFormation API.
#[derive(Debug, Clone)]
pub struct CloudFormationService {
  client: cloudformation::Client,
}

impl CloudFormationService {
  pub fn new(credentials: &Credentials, region: &str, endpoint: &str) -> Self {
    let config = cloudformation::Config::builder()
      .behavior_version(cloudformation::config::BehaviorVersion::latest())
      .region(cloudformation::config::Region::new(region.to_string()))
      .endpoint_url(endpoint)
      .credentials_provider(cloudformation::config::Credentials::new(
        credentials.access_key(),
        credentials.secret_key(),
        None,
        None,
        APP_NAME,
      ))
      .retry_config(cloudformation::config::retry::RetryConfig::disabled())
      .build();

    Self {
      client: cloudformation::Client::from_conf(config),
    }
  }
}

fn to_descriptor(stack: &Stack) -> StackDescriptor {
  StackDescriptor {
    name: stack.stack_name().unwrap_or_default().to_string(),
    parameters: stack
      .parameters()
      .iter()
      .map(|p| StackParameter::new(p.parameter_key().unwrap_or_default(), p.parameter_value().unwrap_or_default()))
      .collect(),
    capabilities: stack.capabilities().iter().map(|c| c.as_str().to_string()).collect(),
  }
}

impl StackService for CloudFormationService {
  async fn get_template(&self, stack_name: &str) -> Result<Option<String>, RemoteError> {
    let output = self
      .client
      .get_template()
      .stack_name(stack_name)
      .send()
      .await
      .map_err(classify)?;
    Ok(output.template_body().map(str::to_string))
  }

  async fn describe_stacks(&self, stack_name: &str) -> Result<Vec<StackDescriptor>, RemoteError> {
    let output = self
      .client
      .describe_stacks()
      .stack_name(stack_name)
      .send()
      .await
      .map_err(classify)?;
    Ok(output.stacks().iter().map(to_descriptor).collect())
  }

  async fn update_stack(&self, request: &UpdateRequest) -> Result<(), RemoteError> {
    let parameters = request
      .parameters
      .iter()
      .map(|p| {
        Parameter::builder()
          .parameter_key(&p.key)
          .parameter_value(&p.value)
          .build()
      })
      .collect();
    let capabilities = request
      .capabilities
      .iter()
      .map(|c| Capability::from(c.as_str()))
      .collect();

    let output = self
      .client
      .update_stack()
      .stack_name(&request.stack_name)
      .template_body(&request.template_body)
      .set_parameters(Some(parameters))
      .set_capabilities(Some(capabilities))
      .send()
      .await
      .map_err(classify)?;
    debug!(stack = %request.stack_name, stack_id = ?output.stack_id(), "update accepted");
    Ok(())
  }
}

/// Build the production clients for `config`.
pub fn connect(config: &DeployConfig, credentials: &Credentials) -> (S3ObjectStore, CloudFormationService) {
  let endpoint = config.cloudformation_endpoint();
  debug!(region = %config.region(), endpoint = %endpoint, "building AWS clients");
  (
    S3ObjectStore::new(credentials, config.region()),
    CloudFormationService::new(credentials, config.region(), &endpoint),
  )
}

#[cfg(test)]
mod tests {
  use std::io;

  use super::*;

  #[test]
  fn service_response_is_service_error() {
    let err: SdkError<io::Error, ()> = SdkError::service_error(io::Error::other("AccessDenied"), ());
    assert_eq!(classify(err).kind(), RemoteErrorKind::Service);
  }

  #[test]
  fn timeout_is_client_error() {
    let err: SdkError<io::Error, ()> = SdkError::timeout_error("operation timed out");
    let remote = classify(err);
    assert_eq!(remote.kind(), RemoteErrorKind::Client);
    assert!(remote.to_string().contains("operation timed out"));
  }

  #[test]
  fn construction_failure_is_client_error() {
    let err: SdkError<io::Error, ()> = SdkError::construction_failure("bad request");
    assert_eq!(classify(err).kind(), RemoteErrorKind::Client);
  }
}
