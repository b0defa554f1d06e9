mod deploy;
mod info;

pub use deploy::{DeployArgs, cmd_deploy};
pub use info::cmd_info;
