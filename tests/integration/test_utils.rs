//! Shared test utilities for integration tests
//!
//! A logger that keeps every message, and a witness plugin that records each hook
//! it runs together with what it saw on the context.

use appinit::context::Context;
use appinit::error::PluginError;
use appinit::headless::HeadlessSurfaceFactory;
use appinit::logging::Logger;
use appinit::orchestrator::Orchestrator;
use appinit::plugin::{HookResult, Phase, Plugin};
use appinit::readiness::ReadinessGate;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

/// Logger that records `(level, message)` pairs.
#[derive(Default)]
pub struct RecordingLogger {
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    fn push(&self, level: Level, message: &str) {
        self.entries.lock().push((level, message.to_string()));
    }
}

impl Logger for RecordingLogger {
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }
}

/// One hook invocation as seen by a [`Witness`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub plugin: String,
    pub phase: Phase,
    pub surface_present: bool,
}

pub type VisitLog = Arc<Mutex<Vec<Visit>>>;

pub fn visit_log() -> VisitLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// How a witness behaves in a given phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeed,
    Fail,
    Panic,
}

/// Plugin that implements a chosen set of hooks and records each call.
pub struct Witness {
    name: String,
    hooks: &'static [Phase],
    log: VisitLog,
    failing: Vec<(Phase, Outcome)>,
}

impl Witness {
    pub fn new(name: &str, hooks: &'static [Phase], log: &VisitLog) -> Self {
        Self {
            name: name.to_string(),
            hooks,
            log: Arc::clone(log),
            failing: Vec::new(),
        }
    }

    pub fn with_outcome(mut self, phase: Phase, outcome: Outcome) -> Self {
        self.failing.push((phase, outcome));
        self
    }

    fn visit(&self, phase: Phase, ctx: &mut Context) -> HookResult {
        self.log.lock().push(Visit {
            plugin: self.name.clone(),
            phase,
            surface_present: ctx.surface().is_some(),
        });
        let outcome = self
            .failing
            .iter()
            .find(|(p, _)| *p == phase)
            .map(|(_, o)| *o)
            .unwrap_or(Outcome::Succeed);
        match outcome {
            Outcome::Succeed => Ok(()),
            Outcome::Fail => Err(PluginError::Failed(format!("{} refused {}", self.name, phase))),
            Outcome::Panic => panic!("{} exploded in {}", self.name, phase),
        }
    }
}

#[async_trait]
impl Plugin for Witness {
    fn name(&self) -> &str {
        &self.name
    }

    fn hooks(&self) -> &'static [Phase] {
        self.hooks
    }

    async fn before_ready(&self, ctx: &mut Context) -> HookResult {
        self.visit(Phase::BeforeReady, ctx)
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        self.visit(Phase::AfterReady, ctx)
    }

    async fn before_load(&self, ctx: &mut Context) -> HookResult {
        self.visit(Phase::BeforeLoad, ctx)
    }

    async fn after_load(&self, ctx: &mut Context) -> HookResult {
        self.visit(Phase::AfterLoad, ctx)
    }
}

/// Orchestrator with immediate readiness, a fresh headless factory, and a
/// recording logger.
pub fn headless_orchestrator() -> (Orchestrator, Arc<HeadlessSurfaceFactory>, Arc<RecordingLogger>) {
    let factory = Arc::new(HeadlessSurfaceFactory::new());
    let logger = RecordingLogger::new();
    let orchestrator = Orchestrator::new(Arc::new(ReadinessGate::ready()), factory.clone())
        .with_logger(logger.clone());
    (orchestrator, factory, logger)
}

/// Serializes tests that change HOME or APPINIT_* variables.
pub static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Points HOME at `home` until dropped.
pub struct HomeGuard {
    original: Option<std::ffi::OsString>,
}

impl HomeGuard {
    pub fn set(home: &std::path::Path) -> Self {
        let original = std::env::var_os("HOME");
        std::env::set_var("HOME", home);
        Self { original }
    }
}

impl Drop for HomeGuard {
    fn drop(&mut self) {
        match self.original.take() {
            Some(home) => std::env::set_var("HOME", home),
            None => std::env::remove_var("HOME"),
        }
    }
}
