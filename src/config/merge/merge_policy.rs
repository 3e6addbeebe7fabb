//! Merge rules: built-in defaults sit beneath every other source.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("app.content", crate::config::DEFAULT_CONTENT)?
        .set_default("app.mode", "windowed")?
        .set_default("app.packaged", false)
}
