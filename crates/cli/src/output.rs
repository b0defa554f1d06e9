//! Terminal output for cfdeploy: status lines, stats and dry-run plans.

use std::time::Duration;

use owo_colors::{OwoColorize, Stream};

use cfdeploy_lib::stack::UpdateRequest;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
  pub const WARNING: &str = "⚠";
  pub const INFO: &str = "•";
  pub const ARROW: &str = "→";
  pub const MODIFY: &str = "~";
}

pub fn format_duration(duration: Duration) -> String {
  let secs = duration.as_secs();
  let millis = duration.subsec_millis();

  if secs >= 60 {
    let mins = secs / 60;
    let remaining_secs = secs % 60;
    format!("{}m {}s", mins, remaining_secs)
  } else if secs > 0 {
    format!("{}.{:02}s", secs, millis / 10)
  } else {
    format!("{}ms", millis)
  }
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    symbols::WARNING.if_supports_color(Stream::Stderr, |s| s.yellow()),
    message.if_supports_color(Stream::Stderr, |s| s.yellow())
  );
}

pub fn print_info(message: &str) {
  println!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stdout, |s| s.blue()),
    message
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}

/// Render one planned stack update: merged parameters, then capabilities.
pub fn print_planned_update(request: &UpdateRequest) {
  println!(
    "  {} {}",
    symbols::MODIFY.if_supports_color(Stream::Stdout, |s| s.yellow()),
    request.stack_name.if_supports_color(Stream::Stdout, |s| s.cyan())
  );
  for line in plan_lines(request) {
    println!("      {line}");
  }
}

fn plan_lines(request: &UpdateRequest) -> Vec<String> {
  let mut lines: Vec<String> = request
    .parameters
    .iter()
    .map(|p| format!("{} {} {}", p.key, symbols::ARROW, p.value))
    .collect();
  if !request.capabilities.is_empty() {
    lines.push(format!("capabilities: {}", request.capabilities.join(", ")));
  }
  lines
}
