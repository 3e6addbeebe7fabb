//! Surface option plugins: set the pending mode and caller overrides in `after_ready`.

use crate::context::Context;
use crate::plugin::{HookResult, Phase, Plugin};
use crate::surface::{SurfaceMode, SurfaceOptions};
use async_trait::async_trait;

const AFTER_READY: &[Phase] = &[Phase::AfterReady];

fn apply(ctx: &mut Context, mode: Option<SurfaceMode>, options: &SurfaceOptions) -> HookResult {
    let pending = ctx.pending_surface_mut()?;
    if let Some(mode) = mode {
        pending.mode = mode;
    }
    pending.overrides.overlay(options);
    Ok(())
}

/// Windowed surface with the given overrides.
#[derive(Debug, Clone, Default)]
pub struct DefaultSurface {
    options: SurfaceOptions,
}

impl DefaultSurface {
    pub fn new(options: SurfaceOptions) -> Self {
        Self { options }
    }
}

#[async_trait]
impl Plugin for DefaultSurface {
    fn name(&self) -> &str {
        "default-surface"
    }

    fn hooks(&self) -> &'static [Phase] {
        AFTER_READY
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        apply(ctx, None, &self.options)
    }
}

/// Kiosk mode when enabled (usually only in packaged builds).
/// Disabled, it behaves like [`DefaultSurface`].
#[derive(Debug, Clone, Default)]
pub struct KioskSurface {
    options: SurfaceOptions,
    enabled: bool,
}

impl KioskSurface {
    pub fn new(options: SurfaceOptions, enabled: bool) -> Self {
        Self { options, enabled }
    }
}

#[async_trait]
impl Plugin for KioskSurface {
    fn name(&self) -> &str {
        "kiosk-surface"
    }

    fn hooks(&self) -> &'static [Phase] {
        AFTER_READY
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        let mode = self.enabled.then_some(SurfaceMode::Kiosk);
        apply(ctx, mode, &self.options)
    }
}

/// Frameless, always-on-top fullscreen surface for apps that cannot run in kiosk mode.
#[derive(Debug, Clone, Default)]
pub struct FullScreenSurface {
    options: SurfaceOptions,
    enabled: bool,
}

impl FullScreenSurface {
    pub fn new(options: SurfaceOptions, enabled: bool) -> Self {
        Self { options, enabled }
    }
}

#[async_trait]
impl Plugin for FullScreenSurface {
    fn name(&self) -> &str {
        "fullscreen-surface"
    }

    fn hooks(&self) -> &'static [Phase] {
        AFTER_READY
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        let mode = self.enabled.then_some(SurfaceMode::Fullscreen);
        apply(ctx, mode, &self.options)
    }
}
