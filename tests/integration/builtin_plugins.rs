//! Built-in plugins running inside a full bootstrap.

use super::test_utils::{headless_orchestrator, Level};
use appinit::context::{FailureKind, SettingValue};
use appinit::error::PluginError;
use appinit::orchestrator::InitOptions;
use appinit::plugin::Phase;
use appinit::plugins::{
    AutoUpdater, AutoUpdaterOptions, DevTools, DevToolsInstaller, Heartbeat, HeartbeatReporter,
    JsonFileSettingsStore, SettingsPlugin,
};
use appinit::surface::SurfaceHandle;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingReporter {
    keys: Mutex<Vec<String>>,
}

#[async_trait]
impl HeartbeatReporter for RecordingReporter {
    async fn start(&self, api_key: &str) -> Result<(), PluginError> {
        self.keys.lock().push(api_key.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn test_persisted_settings_shape_surface_and_feed_heartbeat() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("settings.json");
    std::fs::write(&path, r#"{"app_width": 640, "heartbeat_api_key": "hb-123"}"#).unwrap();

    let reporter = Arc::new(RecordingReporter::default());
    let (orchestrator, factory, _) = headless_orchestrator();

    let ctx = orchestrator
        .run(
            InitOptions::new("app://index.html")
                .with_setting("app_width", 1200)
                .with_setting("app_height", 700)
                .with_plugin(SettingsPlugin::new(Arc::new(JsonFileSettingsStore::new(&path))))
                .with_plugin(Heartbeat::new(true, reporter.clone())),
        )
        .await
        .unwrap();

    let options = factory.last().unwrap().options().clone();
    assert_eq!(options.width, Some(640), "stored value wins over the seed");
    assert_eq!(options.height, Some(700), "seeded value fills the gap");
    assert_eq!(reporter.keys.lock().as_slice(), &["hb-123".to_string()]);
    assert_eq!(ctx.settings()["app_height"], SettingValue::Int(700));
    assert!(ctx.hook_failures().is_empty());

    let on_disk = std::fs::read_to_string(&path).unwrap();
    assert!(on_disk.contains("app_height"));
}

#[tokio::test]
async fn test_missing_settings_store_is_reported_unavailable() {
    let (orchestrator, _, logger) = headless_orchestrator();

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(SettingsPlugin::without_store()))
        .await
        .unwrap();

    assert_eq!(ctx.hook_failures().len(), 1);
    assert_eq!(ctx.hook_failures()[0].kind, FailureKind::Unavailable);
    assert!(logger.contains(Level::Warn, "settings"));
    assert!(logger.messages(Level::Error).is_empty());
}

#[tokio::test]
async fn test_heartbeat_without_key_only_warns() {
    let reporter = Arc::new(RecordingReporter::default());
    let (orchestrator, _, logger) = headless_orchestrator();

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(Heartbeat::new(true, reporter.clone())))
        .await
        .unwrap();

    assert!(reporter.keys.lock().is_empty());
    assert!(ctx.hook_failures().is_empty());
    assert!(logger.contains(Level::Warn, "heartbeat_api_key"));
}

#[tokio::test]
async fn test_auto_updater_without_channel_warns() {
    let (orchestrator, _, logger) = headless_orchestrator();

    let ctx = orchestrator
        .run(
            InitOptions::new("app://index.html")
                .with_plugin(AutoUpdater::without_service(true, AutoUpdaterOptions::default())),
        )
        .await
        .unwrap();

    assert!(ctx.hook_failures().is_empty());
    assert!(logger.contains(Level::Warn, "auto_updater_channel"));
}

#[tokio::test]
async fn test_auto_updater_without_service_is_unavailable() {
    let (orchestrator, _, _) = headless_orchestrator();

    let ctx = orchestrator
        .run(
            InitOptions::new("app://index.html")
                .with_setting("auto_updater_channel", "stable")
                .with_plugin(AutoUpdater::without_service(true, AutoUpdaterOptions::default())),
        )
        .await
        .unwrap();

    let failure = &ctx.hook_failures()[0];
    assert_eq!(failure.plugin, "auto-updater");
    assert_eq!(failure.phase, Phase::AfterLoad);
    assert_eq!(failure.kind, FailureKind::Unavailable);
}

#[derive(Default)]
struct FlakyInstaller {
    opened: Mutex<usize>,
}

#[async_trait]
impl DevToolsInstaller for FlakyInstaller {
    async fn install(&self, _extensions: &[String]) -> Result<(), PluginError> {
        Err(anyhow::anyhow!("extension store offline").into())
    }

    fn open(&self, surface: &SurfaceHandle) {
        assert!(!surface.is_destroyed());
        *self.opened.lock() += 1;
    }
}

#[tokio::test]
async fn test_dev_tools_failure_is_isolated() {
    let installer = Arc::new(FlakyInstaller::default());
    let reporter = Arc::new(RecordingReporter::default());
    let (orchestrator, factory, logger) = headless_orchestrator();

    let ctx = orchestrator
        .run(
            InitOptions::new("app://index.html")
                .with_setting("heartbeat_api_key", "hb-1")
                .with_plugin(DevTools::new(
                    vec!["react-devtools".to_string()],
                    true,
                    installer.clone(),
                ))
                .with_plugin(Heartbeat::new(true, reporter.clone())),
        )
        .await
        .unwrap();

    assert_eq!(*installer.opened.lock(), 1);
    assert_eq!(ctx.hook_failures().len(), 1);
    assert_eq!(ctx.hook_failures()[0].phase, Phase::BeforeLoad);
    assert!(ctx.hook_failures()[0]
        .message
        .contains("Failed to install dev tools"));
    assert!(logger.contains(Level::Error, "dev-tools"));
    assert_eq!(factory.last().unwrap().loads().len(), 1);
    assert_eq!(reporter.keys.lock().len(), 1);
}

#[tokio::test]
async fn test_disabled_dev_tools_do_nothing() {
    let installer = Arc::new(FlakyInstaller::default());
    let (orchestrator, _, _) = headless_orchestrator();

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(DevTools::new(
            vec!["react-devtools".to_string()],
            false,
            installer.clone(),
        )))
        .await
        .unwrap();

    assert_eq!(*installer.opened.lock(), 0);
    assert!(ctx.hook_failures().is_empty());
}
