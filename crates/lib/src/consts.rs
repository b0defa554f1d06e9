/// Application name, used for config directories and log targets.
pub const APP_NAME: &str = "cfdeploy";

/// Region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default build output directory, relative to the working directory.
pub const DEFAULT_BUILD_DIR: &str = "target";

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILENAME: &str = "cfdeploy.toml";

/// Credential store file name inside the config directory.
pub const CREDENTIALS_FILENAME: &str = "credentials.toml";

/// Environment variable overriding the credential store location.
pub const CREDENTIALS_ENV: &str = "CFDEPLOY_CREDENTIALS";
