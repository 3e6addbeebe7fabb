//! Configuration System
//!
//! Layered configuration for a bootstrap run: built-in defaults, the global
//! user file, project files, then `APPINIT__SECTION__KEY` environment
//! variables. Tests included.

use crate::context::types::{APP_HEIGHT_KEY, APP_WIDTH_KEY, BACKGROUND_COLOR_KEY};
use crate::context::{ContentLocator, Settings};
use crate::error::InitError;
use crate::logging::LoggingConfig;
use crate::plugins::auto_start::DEFAULT_STARTUP_DELAY;
use crate::plugins::auto_updater::DEFAULT_CHECK_INTERVAL;
use crate::surface::{SurfaceMode, SurfaceOptions};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

pub const ENV_PREFIX: &str = "APPINIT";
pub const DEFAULT_CONTENT: &str = "app://index.html";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppInitConfig {
    #[serde(default)]
    pub app: AppConfig,

    /// Caller surface overrides
    #[serde(default)]
    pub window: SurfaceOptions,

    /// Initial settings handed to the context
    #[serde(default)]
    pub settings: Settings,

    #[serde(default)]
    pub plugins: PluginsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Content locator loaded into the surface
    #[serde(default = "default_content")]
    pub content: String,

    #[serde(default)]
    pub mode: SurfaceMode,

    /// Packaged builds disable dev tools unless configured otherwise
    #[serde(default)]
    pub packaged: bool,
}

fn default_content() -> String {
    DEFAULT_CONTENT.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content: default_content(),
            mode: SurfaceMode::default(),
            packaged: false,
        }
    }
}

impl AppConfig {
    pub fn content_locator(&self) -> ContentLocator {
        ContentLocator::from(self.content.as_str())
    }
}

/// Per-plugin switches and options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginsConfig {
    #[serde(default)]
    pub settings: SettingsPluginConfig,
    #[serde(default)]
    pub auto_updater: AutoUpdaterConfig,
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
    #[serde(default)]
    pub dev_tools: DevToolsConfig,
    #[serde(default)]
    pub auto_start: AutoStartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsPluginConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Settings file; defaults to `<config_dir>/settings.json`
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for SettingsPluginConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoUpdaterConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default = "default_check_interval_secs")]
    pub interval_secs: u64,
}

fn default_check_interval_secs() -> u64 {
    DEFAULT_CHECK_INTERVAL.as_secs()
}

impl Default for AutoUpdaterConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel: None,
            interval_secs: default_check_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartbeatConfig {
    #[serde(default)]
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DevToolsConfig {
    /// Unset means "enabled unless packaged"
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

impl DevToolsConfig {
    pub fn is_enabled(&self, packaged: bool) -> bool {
        self.enabled.unwrap_or(!packaged)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoStartConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_startup_delay_secs")]
    pub startup_delay_secs: u64,
}

fn default_startup_delay_secs() -> u64 {
    DEFAULT_STARTUP_DELAY.as_secs()
}

impl Default for AutoStartConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            startup_delay_secs: default_startup_delay_secs(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    App(String),
    Window(String),
    Setting(String, String),
    Plugin(String, String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::App(msg) => write!(f, "App: {}", msg),
            ValidationError::Window(msg) => write!(f, "Window: {}", msg),
            ValidationError::Setting(key, msg) => write!(f, "Setting '{}': {}", key, msg),
            ValidationError::Plugin(name, msg) => write!(f, "Plugin '{}': {}", name, msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl AppInitConfig {
    /// Validate the entire configuration, collecting every problem found.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.app.content.trim().is_empty() {
            errors.push(ValidationError::App("content cannot be empty".to_string()));
        }

        if self.window.width == Some(0) {
            errors.push(ValidationError::Window("width must be positive".to_string()));
        }
        if self.window.height == Some(0) {
            errors.push(ValidationError::Window("height must be positive".to_string()));
        }
        if matches!(self.window.background_color.as_deref(), Some(c) if c.trim().is_empty()) {
            errors.push(ValidationError::Window(
                "background_color cannot be empty".to_string(),
            ));
        }

        for key in [APP_WIDTH_KEY, APP_HEIGHT_KEY] {
            if let Some(value) = self.settings.get(key) {
                if value.as_dimension().is_none() {
                    errors.push(ValidationError::Setting(
                        key.to_string(),
                        format!("expected a positive whole number, got {}", value),
                    ));
                }
            }
        }
        if let Some(value) = self.settings.get(BACKGROUND_COLOR_KEY) {
            if value.as_str().is_none() {
                errors.push(ValidationError::Setting(
                    BACKGROUND_COLOR_KEY.to_string(),
                    format!("expected a string, got {}", value),
                ));
            }
        }

        if self.plugins.auto_updater.interval_secs == 0 {
            errors.push(ValidationError::Plugin(
                "auto-updater".to_string(),
                "interval_secs must be positive".to_string(),
            ));
        }
        if self
            .plugins
            .dev_tools
            .extensions
            .iter()
            .any(|ext| ext.trim().is_empty())
        {
            errors.push(ValidationError::Plugin(
                "dev-tools".to_string(),
                "extension identifiers cannot be empty".to_string(),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`AppInitConfig`] from the configuration layers.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a project.
    ///
    /// Precedence (lowest to highest): defaults, global file, project
    /// `config/appinit.toml`, project `config/{APPINIT_ENV}.toml`, environment.
    pub fn load(project_root: &Path) -> Result<AppInitConfig, InitError> {
        let builder = merge::merge_policy::builder_with_defaults()?;
        let builder = sources::global_file::add_to_builder(builder)?;
        let builder = sources::project_file::add_to_builder(builder, project_root)?;
        let config = builder.add_source(env_source()).build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from a single file, still honouring defaults and environment.
    pub fn load_from_file(path: &Path) -> Result<AppInitConfig, InitError> {
        let config = merge::merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .add_source(env_source())
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Load from an explicit file when given, otherwise from the project layers.
    pub fn resolve(project_root: &Path, file: Option<&Path>) -> Result<AppInitConfig, InitError> {
        match file {
            Some(path) => Self::load_from_file(path),
            None => Self::load(project_root),
        }
    }

    /// Load and validate, folding validation errors into one [`InitError`].
    pub fn load_validated(
        project_root: &Path,
        file: Option<&Path>,
    ) -> Result<AppInitConfig, InitError> {
        let config = Self::resolve(project_root, file)?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            InitError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }

    /// Configuration with only the built-in defaults applied.
    pub fn defaults() -> Result<AppInitConfig, InitError> {
        let config: Config = merge::merge_policy::builder_with_defaults()?.build()?;
        Ok(config.try_deserialize()?)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}
