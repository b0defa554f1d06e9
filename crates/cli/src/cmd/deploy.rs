//! Implementation of the `cfdeploy deploy` command.
//!
//! Uploads the build artifact to S3, then updates each named CloudFormation
//! stack with its current template and merged parameters.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use owo_colors::OwoColorize;
use tracing::debug;

use cfdeploy_lib::config::find_config_path;
use cfdeploy_lib::deploy::run;
use cfdeploy_lib::platform::paths::credentials_path;
use cfdeploy_lib::{DeployOptions, DeployReport, DeploySettings, OverrideSet};

use crate::output::{format_duration, print_info, print_planned_update, print_stat, print_success, print_warning};

#[derive(Debug, Args)]
pub struct DeployArgs {
  /// Config file (default: ./cfdeploy.toml if present)
  #[arg(short, long)]
  pub config: Option<PathBuf>,

  /// Credential store file (default: $CFDEPLOY_CREDENTIALS or ~/.config/cfdeploy/credentials.toml)
  #[arg(long)]
  pub credentials_file: Option<PathBuf>,

  /// AWS access key id
  #[arg(long)]
  pub access_key: Option<String>,

  /// AWS secret access key
  #[arg(long)]
  pub secret_key: Option<String>,

  /// Credential store entry to take the key pair from
  #[arg(long)]
  pub server_id: Option<String>,

  /// Destination S3 bucket
  #[arg(short, long)]
  pub bucket: Option<String>,

  /// AWS region (default: us-east-1)
  #[arg(short, long)]
  pub region: Option<String>,

  /// Stack to update; repeat to update several, in order
  #[arg(short, long = "stack", value_name = "NAME")]
  pub stacks: Vec<String>,

  /// Artifact file to upload
  #[arg(short, long)]
  pub artifact: Option<PathBuf>,

  /// Build output directory used with --final-name (default: target)
  #[arg(long)]
  pub build_dir: Option<PathBuf>,

  /// Build output file name, resolved inside --build-dir
  #[arg(long)]
  pub final_name: Option<String>,

  /// Stack parameter override; repeat for several
  #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
  pub params: Vec<(String, String)>,

  /// Read stacks and show merged parameters without uploading or updating
  #[arg(long)]
  pub dry_run: bool,
}

/// Parse a `KEY=VALUE` override. The value may be empty or contain `=`.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
  match s.split_once('=') {
    Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
    _ => Err(format!("invalid parameter '{s}', expected KEY=VALUE")),
  }
}

impl DeployArgs {
  /// Settings given on the command line.
  fn settings(&self) -> DeploySettings {
    DeploySettings {
      access_key: self.access_key.clone(),
      secret_key: self.secret_key.clone(),
      server_id: self.server_id.clone(),
      bucket_name: self.bucket.clone(),
      region: self.region.clone(),
      stack_names: self.stacks.clone(),
      artifact_file: self.artifact.clone(),
      build_dir: self.build_dir.clone(),
      final_name: self.final_name.clone(),
      stack_parameters: self.params.iter().cloned().collect::<OverrideSet>(),
    }
  }
}

/// Execute the deploy command.
///
/// Layers command-line settings over the config file, validates them, and runs
/// the deploy on a fresh async runtime. Any failure aborts with its error.
pub fn cmd_deploy(args: DeployArgs) -> Result<()> {
  let file_settings = match find_config_path(args.config.as_deref())? {
    Some(path) => {
      debug!(path = %path.display(), "using config file");
      DeploySettings::load(&path)?
    }
    None => DeploySettings::default(),
  };

  let store_path = args.credentials_file.clone().unwrap_or_else(credentials_path);
  let config = file_settings.overlay(args.settings()).into_config(store_path)?;

  print_info(&format!(
    "Deploying to {} ({})",
    config.bucket_name().cyan(),
    config.region()
  ));

  let options = DeployOptions { dry_run: args.dry_run };
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(run(&config, &options))?;

  print_report(&report);
  Ok(())
}

fn print_report(report: &DeployReport) {
  println!();
  if report.dry_run {
    print_warning("Dry run - nothing was uploaded or updated");
    for request in &report.planned {
      print_planned_update(request);
    }
  } else {
    print_success("All stacks have been updated. Complete.");
  }

  print_stat("Artifact", &format!("s3://{}/{}", report.bucket, report.key));
  print_stat("Stacks", &report.stacks.join(", "));
  print_stat("Duration", &format_duration(report.duration));
}
