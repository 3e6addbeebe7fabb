//! Phase Orchestrator
//!
//! Drives the bootstrap sequence:
//!
//! `before_ready` → readiness gate → `after_ready` → create surface →
//! `before_load` → load content → show → `after_load` → observe close.
//!
//! Hooks within a phase run one at a time in registration order. Every hook
//! invocation is isolated: errors and panics are logged with the plugin name
//! and phase, recorded on the context, and the sequence continues.

use crate::context::{
    ContentLocator, Context, FailureKind, HookFailure, LifecyclePhase, SettingValue, Settings,
};
use crate::error::InitError;
use crate::logging::{Logger, TracingLogger};
use crate::plugin::{dispatch, implements, Phase, Plugin};
use crate::readiness::ReadinessProvider;
use crate::surface::{
    merge_surface_options, PendingSurface, SurfaceFactory, SurfaceHandle, SurfaceMode,
    SurfaceOptions,
};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Inputs to a single bootstrap run.
pub struct InitOptions {
    pub content_locator: ContentLocator,
    pub settings: Settings,
    pub surface: PendingSurface,
    pub plugins: Vec<Box<dyn Plugin>>,
}

impl InitOptions {
    pub fn new(content_locator: impl Into<ContentLocator>) -> Self {
        Self {
            content_locator: content_locator.into(),
            settings: Settings::new(),
            surface: PendingSurface::default(),
            plugins: Vec::new(),
        }
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<SettingValue>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings.extend(settings);
        self
    }

    pub fn with_surface_mode(mut self, mode: SurfaceMode) -> Self {
        self.surface.mode = mode;
        self
    }

    pub fn with_surface_overrides(mut self, overrides: SurfaceOptions) -> Self {
        self.surface.overrides.overlay(&overrides);
        self
    }

    /// Register a plugin. Registration order is execution order.
    pub fn with_plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    pub fn with_boxed_plugins(mut self, plugins: Vec<Box<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }
}

/// Runs the bootstrap sequence against a readiness provider and surface factory.
pub struct Orchestrator {
    readiness: Arc<dyn ReadinessProvider>,
    factory: Arc<dyn SurfaceFactory>,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    pub fn new(readiness: Arc<dyn ReadinessProvider>, factory: Arc<dyn SurfaceFactory>) -> Self {
        Self {
            readiness,
            factory,
            logger: Arc::new(TracingLogger),
        }
    }

    /// Replace the logger injected into every context this orchestrator builds.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run every phase once and return the resulting context.
    ///
    /// Hook and content-load failures never abort the run. The only error is
    /// a surface the factory could not create, since the load phases require
    /// one. Suspends indefinitely if readiness is never signalled.
    pub async fn run(&self, options: InitOptions) -> Result<Context, InitError> {
        let InitOptions {
            content_locator,
            settings,
            surface,
            plugins,
        } = options;

        let mut ctx = Context::new(content_locator, settings, surface, Arc::clone(&self.logger));
        info!(
            locator = %ctx.content_locator(),
            plugins = plugins.len(),
            "Bootstrap starting"
        );

        self.run_phase(Phase::BeforeReady, &plugins, &mut ctx).await;

        ctx.advance(LifecyclePhase::AwaitingReadiness);
        debug!("Waiting for platform readiness");
        self.readiness.wait_ready().await;

        self.run_phase(Phase::AfterReady, &plugins, &mut ctx).await;

        let surface = self.create_surface(&mut ctx)?;

        self.run_phase(Phase::BeforeLoad, &plugins, &mut ctx).await;

        ctx.advance(LifecyclePhase::Loading);
        self.load_content(&surface, &mut ctx).await;

        if !surface.is_destroyed() && !surface.is_visible() {
            surface.show();
        }

        self.run_phase(Phase::AfterLoad, &plugins, &mut ctx).await;

        ctx.slot().observe_close(surface.as_ref());
        ctx.advance(LifecyclePhase::Ready);

        info!(
            hook_failures = ctx.hook_failures().len(),
            load_failed = ctx.load_failure().is_some(),
            "Bootstrap complete"
        );
        Ok(ctx)
    }

    fn create_surface(&self, ctx: &mut Context) -> Result<SurfaceHandle, InitError> {
        let options = merge_surface_options(ctx.pending_surface(), ctx.settings());
        debug!(mode = ctx.pending_surface().mode.as_str(), ?options, "Creating surface");

        let handle = match self.factory.create(&options) {
            Ok(handle) => handle,
            Err(err) => {
                ctx.logger()
                    .error(&format!("Failed to create surface: {}", err));
                return Err(err.into());
            }
        };
        ctx.attach_surface(Arc::clone(&handle), options)?;
        ctx.advance(LifecyclePhase::SurfaceCreated);
        Ok(handle)
    }

    async fn load_content(&self, surface: &SurfaceHandle, ctx: &mut Context) {
        let locator = ctx.content_locator().clone();
        debug!(locator = %locator, "Loading content");
        if let Err(err) = surface.load(&locator).await {
            let message = err.to_string();
            ctx.logger()
                .error(&format!("Failed to load {}: {}", locator, message));
            ctx.record_load_failure(message);
        }
    }

    async fn run_phase(&self, phase: Phase, plugins: &[Box<dyn Plugin>], ctx: &mut Context) {
        ctx.advance(phase.lifecycle());

        for plugin in plugins {
            let plugin = plugin.as_ref();
            if !implements(plugin, phase) {
                trace!(plugin = plugin.name(), %phase, "Hook not implemented; skipping");
                continue;
            }

            debug!(plugin = plugin.name(), %phase, "Invoking hook");
            let outcome = AssertUnwindSafe(dispatch(plugin, phase, ctx))
                .catch_unwind()
                .await;

            let failure = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(err)) if err.is_unavailable() => {
                    ctx.logger().warn(&format!(
                        "Plugin '{}' skipped {}: {}",
                        plugin.name(),
                        phase,
                        err
                    ));
                    Some((FailureKind::Unavailable, err.to_string()))
                }
                Ok(Err(err)) => {
                    ctx.logger().error(&format!(
                        "Plugin '{}' failed during {}: {}",
                        plugin.name(),
                        phase,
                        err
                    ));
                    Some((FailureKind::Error, err.to_string()))
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    ctx.logger().error(&format!(
                        "Plugin '{}' panicked during {}: {}",
                        plugin.name(),
                        phase,
                        message
                    ));
                    Some((FailureKind::Panic, message))
                }
            };

            if let Some((kind, message)) = failure {
                ctx.record_failure(HookFailure {
                    plugin: plugin.name().to_string(),
                    phase,
                    kind,
                    message,
                });
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "hook panicked".to_string()
    }
}
