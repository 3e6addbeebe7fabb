//! Heartbeat: starts uptime reporting once content has loaded.

use crate::context::types::HEARTBEAT_API_KEY;
use crate::context::Context;
use crate::error::PluginError;
use crate::plugin::{HookResult, Phase, Plugin};
use async_trait::async_trait;
use std::sync::Arc;

/// Uptime reporter, provided by the monitoring integration.
#[async_trait]
pub trait HeartbeatReporter: Send + Sync {
    /// Begin reporting. Expected to return promptly and report in the background.
    async fn start(&self, api_key: &str) -> Result<(), PluginError>;
}

pub struct Heartbeat {
    enabled: bool,
    reporter: Option<Arc<dyn HeartbeatReporter>>,
}

impl Heartbeat {
    pub fn new(enabled: bool, reporter: Arc<dyn HeartbeatReporter>) -> Self {
        Self {
            enabled,
            reporter: Some(reporter),
        }
    }

    pub fn without_reporter(enabled: bool) -> Self {
        Self {
            enabled,
            reporter: None,
        }
    }
}

#[async_trait]
impl Plugin for Heartbeat {
    fn name(&self) -> &str {
        "heartbeat"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterLoad]
    }

    async fn after_load(&self, ctx: &mut Context) -> HookResult {
        if !self.enabled {
            return Ok(());
        }

        let Some(api_key) = ctx
            .setting_str(HEARTBEAT_API_KEY)
            .filter(|key| !key.is_empty())
            .map(str::to_string)
        else {
            ctx.logger().warn(&format!(
                "{} was not set in the settings. Heartbeat was not started.",
                HEARTBEAT_API_KEY
            ));
            return Ok(());
        };

        let reporter = self.reporter.as_ref().ok_or_else(|| {
            PluginError::Unavailable("no heartbeat reporter configured".to_string())
        })?;
        reporter.start(&api_key).await?;
        ctx.logger().info("Heartbeat started");
        Ok(())
    }
}
