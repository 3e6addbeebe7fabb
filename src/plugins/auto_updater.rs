//! Auto-updater: checks the update channel now and then on an interval,
//! installing as soon as an update has been downloaded.

use crate::context::types::AUTO_UPDATER_CHANNEL_KEY;
use crate::context::Context;
use crate::error::PluginError;
use crate::logging::Logger;
use crate::plugin::{HookResult, Phase, Plugin};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    NotAvailable,
    Downloaded { version: String },
}

/// Update checking and installation, provided by the platform.
#[async_trait]
pub trait UpdateService: Send + Sync {
    async fn check_for_updates(&self, channel: &str) -> Result<UpdateStatus, PluginError>;

    /// Quit the application and install the downloaded update.
    fn quit_and_install(&self);
}

#[derive(Debug, Clone)]
pub struct AutoUpdaterOptions {
    /// Update channel. Falls back to the `auto_updater_channel` setting.
    pub channel: Option<String>,
    pub interval: Duration,
}

impl Default for AutoUpdaterOptions {
    fn default() -> Self {
        Self {
            channel: None,
            interval: DEFAULT_CHECK_INTERVAL,
        }
    }
}

pub struct AutoUpdater {
    enabled: bool,
    options: AutoUpdaterOptions,
    service: Option<Arc<dyn UpdateService>>,
}

impl AutoUpdater {
    pub fn new(enabled: bool, options: AutoUpdaterOptions, service: Arc<dyn UpdateService>) -> Self {
        Self {
            enabled,
            options,
            service: Some(service),
        }
    }

    /// Updater with no update service; reports the service as unavailable.
    pub fn without_service(enabled: bool, options: AutoUpdaterOptions) -> Self {
        Self {
            enabled,
            options,
            service: None,
        }
    }

    fn resolve_channel(&self, ctx: &Context) -> Option<String> {
        self.options
            .channel
            .clone()
            .or_else(|| ctx.setting_str(AUTO_UPDATER_CHANNEL_KEY).map(str::to_string))
            .filter(|channel| !channel.is_empty())
    }
}

#[async_trait]
impl Plugin for AutoUpdater {
    fn name(&self) -> &str {
        "auto-updater"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterLoad]
    }

    async fn after_load(&self, ctx: &mut Context) -> HookResult {
        if !self.enabled {
            return Ok(());
        }

        let Some(channel) = self.resolve_channel(ctx) else {
            ctx.logger().warn(&format!(
                "{} was not set in the settings. AutoUpdater was not started.",
                AUTO_UPDATER_CHANNEL_KEY
            ));
            return Ok(());
        };

        let service = self
            .service
            .clone()
            .ok_or_else(|| PluginError::Unavailable("no update service configured".to_string()))?;

        ctx.logger()
            .info(&format!("AutoUpdater started on channel '{}'", channel));
        spawn_update_loop(service, channel, self.options.interval, ctx.logger_handle());
        Ok(())
    }
}

/// Check immediately, then every `interval`, until an update is installed.
pub fn spawn_update_loop(
    service: Arc<dyn UpdateService>,
    channel: String,
    interval: Duration,
    logger: Arc<dyn Logger>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match service.check_for_updates(&channel).await {
                Ok(UpdateStatus::Downloaded { version }) => {
                    logger.info(&format!("Update {} downloaded... restarting", version));
                    service.quit_and_install();
                    break;
                }
                Ok(UpdateStatus::NotAvailable) => {
                    logger.info("No update available. Will try again soon.");
                }
                Err(err) => {
                    logger.error(&format!("Update check failed: {}", err));
                }
            }
        }
    })
}
