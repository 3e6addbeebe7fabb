//! Dev tools: opens the inspector on the surface and installs extensions.
//! Usually enabled only in unpackaged builds.

use crate::context::Context;
use crate::error::PluginError;
use crate::plugin::{HookResult, Phase, Plugin};
use crate::surface::SurfaceHandle;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait DevToolsInstaller: Send + Sync {
    async fn install(&self, extensions: &[String]) -> Result<(), PluginError>;

    /// Open the inspector for `surface` once it is ready to show.
    fn open(&self, surface: &SurfaceHandle);
}

pub struct DevTools {
    extensions: Vec<String>,
    enabled: bool,
    installer: Option<Arc<dyn DevToolsInstaller>>,
}

impl DevTools {
    pub fn new(extensions: Vec<String>, enabled: bool, installer: Arc<dyn DevToolsInstaller>) -> Self {
        Self {
            extensions,
            enabled,
            installer: Some(installer),
        }
    }

    pub fn without_installer(extensions: Vec<String>, enabled: bool) -> Self {
        Self {
            extensions,
            enabled,
            installer: None,
        }
    }
}

#[async_trait]
impl Plugin for DevTools {
    fn name(&self) -> &str {
        "dev-tools"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::BeforeLoad]
    }

    async fn before_load(&self, ctx: &mut Context) -> HookResult {
        if !self.enabled {
            return Ok(());
        }
        let installer = self
            .installer
            .as_ref()
            .ok_or_else(|| PluginError::Unavailable("no dev tools installer".to_string()))?;

        let surface = ctx.require_surface()?;
        installer.open(&surface);

        if self.extensions.is_empty() {
            return Ok(());
        }
        installer.install(&self.extensions).await.map_err(|err| {
            PluginError::Failed(format!(
                "Failed to install dev tools: {}: {}",
                self.extensions.join(","),
                err
            ))
        })
    }
}
