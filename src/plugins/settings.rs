//! Persisted settings: loads stored settings into the context in `after_ready`.
//!
//! Stored values win over the run's initial settings; initial settings only
//! seed keys the store does not have yet.

use crate::context::{Context, Settings};
use crate::error::{InitError, PluginError};
use crate::plugin::{HookResult, Phase, Plugin};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Backing store for persisted settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load stored settings, seeding any key missing from the store with the
    /// value in `seed`. Returns the merged result.
    async fn load(&self, seed: &Settings) -> Result<Settings, PluginError>;
}

/// Settings kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSettingsStore {
    path: PathBuf,
}

impl JsonFileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<config_dir>/settings.json` for the current platform.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "appinit")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Settings, InitError> {
        if !self.path.exists() {
            return Ok(Settings::new());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Settings::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write(&self, settings: &Settings) -> Result<(), InitError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for JsonFileSettingsStore {
    async fn load(&self, seed: &Settings) -> Result<Settings, PluginError> {
        let mut stored = self
            .read()
            .map_err(|e| PluginError::Settings(format!("{}: {}", self.path.display(), e)))?;

        let mut seeded = 0usize;
        for (key, value) in seed {
            if !stored.contains_key(key) {
                stored.insert(key.clone(), value.clone());
                seeded += 1;
            }
        }

        if seeded > 0 || !self.path.exists() {
            self.write(&stored)
                .map_err(|e| PluginError::Settings(format!("{}: {}", self.path.display(), e)))?;
        }
        debug!(path = %self.path.display(), seeded, total = stored.len(), "Settings loaded");
        Ok(stored)
    }
}

/// Replaces the context settings with the persisted settings.
#[derive(Clone, Default)]
pub struct SettingsPlugin {
    store: Option<Arc<dyn SettingsStore>>,
}

impl SettingsPlugin {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Plugin with no store; its hook reports the store as unavailable.
    pub fn without_store() -> Self {
        Self { store: None }
    }
}

#[async_trait]
impl Plugin for SettingsPlugin {
    fn name(&self) -> &str {
        "settings"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterReady]
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PluginError::Unavailable("no settings store configured".to_string()))?;
        let loaded = store.load(ctx.settings()).await?;
        *ctx.settings_mut() = loaded;
        Ok(())
    }
}
