//! Auto-start: registers the app as a login item and, on boot launches,
//! delays surface creation so the desktop can settle.
//!
//! Boot launches are recognised by the [`AUTOSTART_ARG`] argument passed by the
//! login item. Only Windows passes it reliably, so detection is off elsewhere.

use crate::context::Context;
use crate::error::PluginError;
use crate::plugin::{HookResult, Phase, Plugin};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Argument passed to the login item so boot launches can be detected.
pub const AUTOSTART_ARG: &str = "--autostart";

pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(30);

/// OS login item registration.
pub trait LoginItems: Send + Sync {
    fn register(&self, args: &[String]) -> Result<(), PluginError>;
}

pub struct AutoStart {
    enabled: bool,
    startup_delay: Duration,
    boot_detection: bool,
    launch_args: Vec<String>,
    login_items: Option<Arc<dyn LoginItems>>,
}

impl AutoStart {
    pub fn new(enabled: bool, startup_delay: Duration, login_items: Arc<dyn LoginItems>) -> Self {
        Self {
            enabled,
            startup_delay,
            boot_detection: cfg!(windows),
            launch_args: std::env::args().collect(),
            login_items: Some(login_items),
        }
    }

    pub fn without_login_items(enabled: bool, startup_delay: Duration) -> Self {
        Self {
            enabled,
            startup_delay,
            boot_detection: cfg!(windows),
            launch_args: std::env::args().collect(),
            login_items: None,
        }
    }

    /// Override the process arguments inspected for [`AUTOSTART_ARG`].
    pub fn with_launch_args(mut self, args: Vec<String>) -> Self {
        self.launch_args = args;
        self
    }

    /// Force boot-launch detection on or off regardless of platform.
    pub fn with_boot_detection(mut self, enabled: bool) -> Self {
        self.boot_detection = enabled;
        self
    }

    fn is_boot_launch(&self) -> bool {
        self.boot_detection && self.launch_args.iter().any(|arg| arg == AUTOSTART_ARG)
    }

    fn login_item_args(&self) -> Vec<String> {
        if self.boot_detection {
            vec![AUTOSTART_ARG.to_string()]
        } else {
            Vec::new()
        }
    }

    async fn delay_boot_launch(&self, ctx: &mut Context) {
        if self.startup_delay.is_zero() {
            return;
        }
        if self.is_boot_launch() {
            ctx.logger().info(&format!(
                "[AutoStart] Boot launch detected, delaying {}s before surface creation",
                self.startup_delay.as_secs()
            ));
            tokio::time::sleep(self.startup_delay).await;
        } else {
            ctx.logger()
                .info("[AutoStart] Manual launch, skipping startup delay");
        }
    }
}

#[async_trait]
impl Plugin for AutoStart {
    fn name(&self) -> &str {
        "auto-start"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterReady]
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        if !self.enabled {
            ctx.logger().info("[AutoStart] Disabled");
            return Ok(());
        }

        // The startup delay applies even without a registry.
        let registration = match &self.login_items {
            Some(items) => {
                match items.register(&self.login_item_args()) {
                    Ok(()) => ctx.logger().info("[AutoStart] Registered as login item"),
                    Err(err) => ctx
                        .logger()
                        .error(&format!("[AutoStart] Failed to register login item: {}", err)),
                }
                Ok(())
            }
            None => Err(PluginError::Unavailable(
                "no login item registry configured".to_string(),
            )),
        };

        self.delay_boot_launch(ctx).await;
        registration
    }
}
