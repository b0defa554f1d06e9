//! cfdeploy-lib: upload a build artifact and roll it out to CloudFormation stacks.
//!
//! This crate provides:
//! - `DeployConfig`: the validated, immutable configuration of one invocation
//! - `CredentialSource`: explicit or credential-store backed AWS credentials
//! - `merge_parameters`: the overlay of caller overrides onto stack parameters
//! - `deploy::run`: the upload-then-update-each-stack flow

pub mod artifact;
pub mod config;
pub mod consts;
pub mod credentials;
pub mod deploy;
pub mod error;
pub mod platform;
pub mod remote;
pub mod stack;
mod util;

pub use config::{DeployConfig, DeploySettings};
pub use deploy::{DeployOptions, DeployReport};
pub use error::{DeployError, ErrorKind};
pub use stack::{OverrideSet, StackParameter, merge_parameters};
