//! Project config file source: config/appinit.toml and config/{env}.toml

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::File;
use std::path::Path;

pub const ENV_VAR: &str = "APPINIT_ENV";
pub const DEFAULT_ENV: &str = "development";

/// Add project config files to the builder.
/// Precedence: config/appinit.toml (base) then config/{APPINIT_ENV}.toml.
pub fn add_to_builder(
    mut builder: ConfigBuilder<DefaultState>,
    project_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let config_dir = project_root.join("config");
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());

    for path in [
        config_dir.join("appinit.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ] {
        if path.exists() {
            builder = builder.add_source(File::from(path).required(false));
        }
    }

    Ok(builder)
}
