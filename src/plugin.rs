//! Plugin Hook Contract
//!
//! A plugin implements any subset of the four phase hooks. Every hook has a
//! no-op default; [`Plugin::hooks`] declares which ones the orchestrator should
//! actually invoke, so undeclared phases are skipped without a call.
//!
//! Hooks take `&self`: plugins carry constructor-time configuration only.
//! Work that must outlive a hook (periodic checks, reporters) is spawned from
//! within the hook and runs independently.

use crate::context::{Context, LifecyclePhase};
use crate::error::PluginError;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// A phase at which plugins are offered a chance to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Before platform readiness. No surface.
    BeforeReady,
    /// After readiness, before surface creation. Pending options are writable.
    AfterReady,
    /// Surface exists; content not yet requested.
    BeforeLoad,
    /// Content load has been requested and the surface shown.
    AfterLoad,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [
        Phase::BeforeReady,
        Phase::AfterReady,
        Phase::BeforeLoad,
        Phase::AfterLoad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::BeforeReady => "before_ready",
            Phase::AfterReady => "after_ready",
            Phase::BeforeLoad => "before_load",
            Phase::AfterLoad => "after_load",
        }
    }

    /// The lifecycle state entered while this phase's hooks run.
    pub fn lifecycle(&self) -> LifecyclePhase {
        match self {
            Phase::BeforeReady => LifecyclePhase::BeforeReady,
            Phase::AfterReady => LifecyclePhase::AfterReady,
            Phase::BeforeLoad => LifecyclePhase::BeforeLoad,
            Phase::AfterLoad => LifecyclePhase::AfterLoad,
        }
    }

    /// True for phases where the context holds a surface.
    pub fn has_surface(&self) -> bool {
        matches!(self, Phase::BeforeLoad | Phase::AfterLoad)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for hook invocations.
pub type HookResult = Result<(), PluginError>;

#[async_trait]
pub trait Plugin: Send + Sync {
    /// Identity used in logs and failure records.
    fn name(&self) -> &str;

    /// Phases this plugin implements.
    fn hooks(&self) -> &'static [Phase] {
        &Phase::ALL
    }

    /// Must not touch the surface: it does not exist yet.
    async fn before_ready(&self, _ctx: &mut Context) -> HookResult {
        Ok(())
    }

    /// Must not touch the surface: it does not exist yet.
    async fn after_ready(&self, _ctx: &mut Context) -> HookResult {
        Ok(())
    }

    /// The surface is present. Observe it; never replace it.
    async fn before_load(&self, _ctx: &mut Context) -> HookResult {
        Ok(())
    }

    /// The surface is present. Observe it; never replace it.
    async fn after_load(&self, _ctx: &mut Context) -> HookResult {
        Ok(())
    }
}

impl fmt::Debug for dyn Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name())
            .field("hooks", &self.hooks())
            .finish()
    }
}

/// True if `plugin` declares a hook for `phase`.
pub fn implements(plugin: &dyn Plugin, phase: Phase) -> bool {
    plugin.hooks().contains(&phase)
}

/// Invoke the hook for `phase` on `plugin`.
pub async fn dispatch(plugin: &dyn Plugin, phase: Phase, ctx: &mut Context) -> HookResult {
    match phase {
        Phase::BeforeReady => plugin.before_ready(ctx).await,
        Phase::AfterReady => plugin.after_ready(ctx).await,
        Phase::BeforeLoad => plugin.before_load(ctx).await,
        Phase::AfterLoad => plugin.after_load(ctx).await,
    }
}
