//! Built-in plugins.
//!
//! Each plugin is configured through its constructor and hands platform
//! mechanics to a collaborator trait. A plugin whose collaborator is missing
//! reports [`PluginError::Unavailable`](crate::error::PluginError::Unavailable)
//! from its hook instead of failing the run.

pub mod auto_start;
pub mod auto_updater;
pub mod dev_tools;
pub mod heartbeat;
pub mod settings;
pub mod surface;

pub use auto_start::{AutoStart, LoginItems, AUTOSTART_ARG};
pub use auto_updater::{AutoUpdater, AutoUpdaterOptions, UpdateService, UpdateStatus};
pub use dev_tools::{DevTools, DevToolsInstaller};
pub use heartbeat::{Heartbeat, HeartbeatReporter};
pub use settings::{JsonFileSettingsStore, SettingsPlugin, SettingsStore};
pub use surface::{DefaultSurface, FullScreenSurface, KioskSurface};

use crate::config::AppInitConfig;
use crate::plugin::Plugin;
use crate::surface::SurfaceMode;
use std::sync::Arc;
use std::time::Duration;

/// Platform collaborators available to the built-in plugins.
#[derive(Clone, Default)]
pub struct Collaborators {
    pub settings_store: Option<Arc<dyn SettingsStore>>,
    pub update_service: Option<Arc<dyn UpdateService>>,
    pub heartbeat_reporter: Option<Arc<dyn HeartbeatReporter>>,
    pub dev_tools_installer: Option<Arc<dyn DevToolsInstaller>>,
    pub login_items: Option<Arc<dyn LoginItems>>,
}

/// Build the configured plugin list in execution order.
///
/// Settings load first so later plugins see persisted values; auto-start runs
/// after the surface plugin so its delay comes last before creation.
pub fn build_plugins(config: &AppInitConfig, collaborators: &Collaborators) -> Vec<Box<dyn Plugin>> {
    let plugins_config = &config.plugins;
    let mut plugins: Vec<Box<dyn Plugin>> = Vec::new();

    if plugins_config.settings.enabled {
        let store = collaborators.settings_store.clone().or_else(|| {
            plugins_config
                .settings
                .path
                .clone()
                .or_else(JsonFileSettingsStore::default_path)
                .map(|path| Arc::new(JsonFileSettingsStore::new(path)) as Arc<dyn SettingsStore>)
        });
        plugins.push(Box::new(match store {
            Some(store) => SettingsPlugin::new(store),
            None => SettingsPlugin::without_store(),
        }));
    }

    let window = config.window.clone();
    let surface: Box<dyn Plugin> = match config.app.mode {
        SurfaceMode::Windowed => Box::new(DefaultSurface::new(window)),
        SurfaceMode::Kiosk => Box::new(KioskSurface::new(window, true)),
        SurfaceMode::Fullscreen => Box::new(FullScreenSurface::new(window, true)),
    };
    plugins.push(surface);

    let auto_start = &plugins_config.auto_start;
    let delay = Duration::from_secs(auto_start.startup_delay_secs);
    plugins.push(Box::new(match &collaborators.login_items {
        Some(items) => AutoStart::new(auto_start.enabled, delay, Arc::clone(items)),
        None => AutoStart::without_login_items(auto_start.enabled, delay),
    }));

    let dev_tools = &plugins_config.dev_tools;
    let dev_tools_enabled = dev_tools.is_enabled(config.app.packaged);
    let extensions = dev_tools.extensions.clone();
    plugins.push(Box::new(match &collaborators.dev_tools_installer {
        Some(installer) => DevTools::new(extensions, dev_tools_enabled, Arc::clone(installer)),
        None => DevTools::without_installer(extensions, dev_tools_enabled),
    }));

    let updater = &plugins_config.auto_updater;
    let updater_options = AutoUpdaterOptions {
        channel: updater.channel.clone(),
        interval: Duration::from_secs(updater.interval_secs),
    };
    plugins.push(Box::new(match &collaborators.update_service {
        Some(service) => AutoUpdater::new(updater.enabled, updater_options, Arc::clone(service)),
        None => AutoUpdater::without_service(updater.enabled, updater_options),
    }));

    let heartbeat_enabled = plugins_config.heartbeat.enabled;
    plugins.push(Box::new(match &collaborators.heartbeat_reporter {
        Some(reporter) => Heartbeat::new(heartbeat_enabled, Arc::clone(reporter)),
        None => Heartbeat::without_reporter(heartbeat_enabled),
    }));

    plugins
}
