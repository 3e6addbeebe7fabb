//! Bootstrap context threaded through every lifecycle phase.
//!
//! The orchestrator owns the context and lends it mutably to one hook at a
//! time. Pending surface options are writable until the surface is created;
//! the surface reference is readable from creation until the surface closes.

pub mod types;

use crate::error::{InitError, SurfaceError};
use crate::logging::Logger;
use crate::plugin::Phase;
use crate::surface::{PendingSurface, SurfaceHandle, SurfaceOptions, SurfaceSlot};
use serde::Serialize;
use std::sync::Arc;

pub use types::{ContentLocator, LifecyclePhase, SettingValue, Settings};

/// How a hook invocation went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The hook returned an error.
    Error,
    /// The hook panicked.
    Panic,
    /// An optional collaborator was missing; the hook had no effect.
    Unavailable,
}

/// A recorded, isolated hook failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookFailure {
    pub plugin: String,
    pub phase: Phase,
    pub kind: FailureKind,
    pub message: String,
}

impl From<HookFailure> for InitError {
    fn from(failure: HookFailure) -> Self {
        InitError::HookFailed {
            plugin: failure.plugin,
            phase: failure.phase,
            message: failure.message,
        }
    }
}

pub struct Context {
    content_locator: ContentLocator,
    settings: Settings,
    pending: PendingSurface,
    surface_options: Option<SurfaceOptions>,
    surface: SurfaceSlot,
    logger: Arc<dyn Logger>,
    phase: LifecyclePhase,
    hook_failures: Vec<HookFailure>,
    load_failure: Option<String>,
}

impl Context {
    pub fn new(
        content_locator: ContentLocator,
        settings: Settings,
        pending: PendingSurface,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            content_locator,
            settings,
            pending,
            surface_options: None,
            surface: SurfaceSlot::new(),
            logger,
            phase: LifecyclePhase::Created,
            hook_failures: Vec::new(),
            load_failure: None,
        }
    }

    pub fn content_locator(&self) -> &ContentLocator {
        &self.content_locator
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Convenience lookup for a string setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.settings.get(key).and_then(SettingValue::as_str)
    }

    pub fn set_setting(&mut self, key: impl Into<String>, value: impl Into<SettingValue>) {
        self.settings.insert(key.into(), value.into());
    }

    pub fn pending_surface(&self) -> &PendingSurface {
        &self.pending
    }

    /// Mutable pending options. Fails once the surface exists, since later
    /// changes could not affect it.
    pub fn pending_surface_mut(&mut self) -> Result<&mut PendingSurface, SurfaceError> {
        if self.phase.surface_created() {
            return Err(SurfaceError::AlreadyCreated);
        }
        Ok(&mut self.pending)
    }

    /// Final options the surface was built with; `None` before creation.
    pub fn surface_options(&self) -> Option<&SurfaceOptions> {
        self.surface_options.as_ref()
    }

    /// The surface, present from creation until it closes.
    pub fn surface(&self) -> Option<SurfaceHandle> {
        self.surface.get()
    }

    /// The surface, as an error when absent. For hooks that require it.
    pub fn require_surface(&self) -> Result<SurfaceHandle, SurfaceError> {
        self.surface.get().ok_or(SurfaceError::Destroyed)
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Shared logger, for plugins that spawn background work.
    pub fn logger_handle(&self) -> Arc<dyn Logger> {
        Arc::clone(&self.logger)
    }

    /// Current state-machine position. Reports `Closed` once the surface has
    /// been closed after the sequence completed.
    pub fn phase(&self) -> LifecyclePhase {
        if self.phase == LifecyclePhase::Ready && self.surface.is_closed() {
            LifecyclePhase::Closed
        } else {
            self.phase
        }
    }

    pub fn is_closed(&self) -> bool {
        self.surface.is_closed()
    }

    pub fn hook_failures(&self) -> &[HookFailure] {
        &self.hook_failures
    }

    pub fn load_failure(&self) -> Option<&str> {
        self.load_failure.as_deref()
    }

    pub(crate) fn advance(&mut self, next: LifecyclePhase) {
        debug_assert!(next > self.phase, "lifecycle must move forward");
        tracing::debug!(from = %self.phase, to = %next, "Lifecycle transition");
        self.phase = next;
    }

    pub(crate) fn attach_surface(
        &mut self,
        handle: SurfaceHandle,
        options: SurfaceOptions,
    ) -> Result<(), SurfaceError> {
        self.surface.attach(handle)?;
        self.surface_options = Some(options);
        Ok(())
    }

    pub(crate) fn slot(&self) -> &SurfaceSlot {
        &self.surface
    }

    pub(crate) fn record_failure(&mut self, failure: HookFailure) {
        self.hook_failures.push(failure);
    }

    pub(crate) fn record_load_failure(&mut self, message: String) {
        self.load_failure = Some(message);
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("content_locator", &self.content_locator)
            .field("settings", &self.settings)
            .field("pending", &self.pending)
            .field("surface", &self.surface)
            .field("phase", &self.phase())
            .field("hook_failures", &self.hook_failures)
            .field("load_failure", &self.load_failure)
            .finish()
    }
}
