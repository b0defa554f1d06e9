use anyhow::Result;

use cfdeploy_lib::config::find_config_path;
use cfdeploy_lib::consts::{CONFIG_FILENAME, DEFAULT_REGION};
use cfdeploy_lib::platform::paths::credentials_path;

pub fn cmd_info() -> Result<()> {
  println!("cfdeploy {}", env!("CARGO_PKG_VERSION"));
  println!();

  match find_config_path(None)? {
    Some(path) => println!("Config:         {}", path.display()),
    None => println!("Config:         none ({} not found)", CONFIG_FILENAME),
  }

  let store = credentials_path();
  let state = if store.is_file() { "" } else { " (missing)" };
  println!("Credentials:    {}{}", store.display(), state);
  println!("Default region: {}", DEFAULT_REGION);

  Ok(())
}
