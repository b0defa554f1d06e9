mod cmd;
mod output;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::DeployArgs;
use output::print_error;

/// cfdeploy - upload a build artifact and roll it out to CloudFormation stacks
#[derive(Parser)]
#[command(name = "cfdeploy")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Upload the artifact and update each stack
  #[command(alias = "update-cf")]
  Deploy(DeployArgs),

  /// Show version and resolved file locations
  Info,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let level = if cli.verbose { "debug" } else { "info" };
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("warn,cfdeploy_lib={level},cfdeploy={level}")));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let result = match cli.command {
    Commands::Deploy(args) => cmd::cmd_deploy(args),
    Commands::Info => cmd::cmd_info(),
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}
