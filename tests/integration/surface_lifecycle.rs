//! Surface presence across phases and close handling.

use super::test_utils::{headless_orchestrator, visit_log, Witness};
use appinit::context::{ContentLocator, Context, LifecyclePhase};
use appinit::error::{PluginError, SurfaceError};
use appinit::orchestrator::{InitOptions, Orchestrator};
use appinit::plugin::{HookResult, Phase, Plugin};
use appinit::readiness::ReadinessGate;
use appinit::surface::{
    CloseObserver, Surface, SurfaceFactory, SurfaceHandle, SurfaceMode, SurfaceOptions,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn test_surface_absent_before_creation_and_present_after() {
    let log = visit_log();
    let (orchestrator, _, _) = headless_orchestrator();

    orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(Witness::new("witness", &Phase::ALL, &log)))
        .await
        .unwrap();

    for visit in log.lock().iter() {
        assert_eq!(
            visit.surface_present,
            visit.phase.has_surface(),
            "surface presence wrong during {}",
            visit.phase
        );
    }
}

#[tokio::test]
async fn test_close_clears_surface_once() {
    let (orchestrator, factory, _) = headless_orchestrator();
    let ctx = orchestrator.run(InitOptions::new("app://index.html")).await.unwrap();

    assert_eq!(ctx.phase(), LifecyclePhase::Ready);
    assert!(ctx.surface().is_some());

    let surface = factory.last().unwrap();
    surface.close();
    assert!(ctx.surface().is_none());
    assert!(ctx.is_closed());
    assert_eq!(ctx.phase(), LifecyclePhase::Closed);

    // A second close event is a no-op.
    surface.close();
    assert!(ctx.surface().is_none());
    assert_eq!(ctx.phase(), LifecyclePhase::Closed);
}

#[tokio::test]
async fn test_close_after_context_dropped_is_harmless() {
    let (orchestrator, factory, _) = headless_orchestrator();
    let ctx = orchestrator.run(InitOptions::new("app://index.html")).await.unwrap();
    drop(ctx);
    factory.last().unwrap().close();
}

/// Keeps the handle it sees in `after_load`, as a plugin with background work would.
#[derive(Clone, Default)]
struct HandleKeeper {
    kept: Arc<Mutex<Option<SurfaceHandle>>>,
}

#[async_trait]
impl Plugin for HandleKeeper {
    fn name(&self) -> &str {
        "handle-keeper"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterLoad]
    }

    async fn after_load(&self, ctx: &mut Context) -> HookResult {
        *self.kept.lock() = Some(ctx.require_surface()?);
        Ok(())
    }
}

#[tokio::test]
async fn test_captured_handle_reports_destroyed_after_close() {
    let keeper = HandleKeeper::default();
    let (orchestrator, factory, _) = headless_orchestrator();

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(keeper.clone()))
        .await
        .unwrap();

    let kept = keeper.kept.lock().clone().unwrap();
    assert!(!kept.is_destroyed());

    factory.last().unwrap().close();
    assert!(kept.is_destroyed());
    assert!(ctx.surface().is_none());
}

/// Tries to change pending options from every phase and records the outcome.
#[derive(Clone, Default)]
struct LateWriter {
    outcomes: Arc<Mutex<Vec<(Phase, bool)>>>,
}

impl LateWriter {
    fn attempt(&self, phase: Phase, ctx: &mut Context) -> HookResult {
        let result = ctx.pending_surface_mut().map(|pending| {
            pending.mode = SurfaceMode::Kiosk;
        });
        self.outcomes.lock().push((phase, result.is_ok()));
        result.map_err(PluginError::from)
    }
}

#[async_trait]
impl Plugin for LateWriter {
    fn name(&self) -> &str {
        "late-writer"
    }

    async fn before_ready(&self, ctx: &mut Context) -> HookResult {
        self.attempt(Phase::BeforeReady, ctx)
    }

    async fn after_ready(&self, ctx: &mut Context) -> HookResult {
        self.attempt(Phase::AfterReady, ctx)
    }

    async fn before_load(&self, ctx: &mut Context) -> HookResult {
        self.attempt(Phase::BeforeLoad, ctx)
    }

    async fn after_load(&self, ctx: &mut Context) -> HookResult {
        self.attempt(Phase::AfterLoad, ctx)
    }
}

#[tokio::test]
async fn test_pending_options_frozen_after_creation() {
    let writer = LateWriter::default();
    let (orchestrator, factory, _) = headless_orchestrator();

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(writer.clone()))
        .await
        .unwrap();

    assert_eq!(
        writer.outcomes.lock().as_slice(),
        &[
            (Phase::BeforeReady, true),
            (Phase::AfterReady, true),
            (Phase::BeforeLoad, false),
            (Phase::AfterLoad, false),
        ]
    );
    // The write that landed before creation shaped the surface.
    assert_eq!(factory.last().unwrap().options().kiosk, Some(true));
    assert_eq!(ctx.hook_failures().len(), 2);
    assert!(ctx
        .hook_failures()
        .iter()
        .all(|f| f.phase.has_surface() && f.plugin == "late-writer"));
}

/// Surface whose close event reaches only the observers registered before it.
#[derive(Default)]
struct EdgeSurface {
    destroyed: AtomicBool,
    observers: Mutex<Vec<CloseObserver>>,
}

impl EdgeSurface {
    fn close(&self) {
        if !self.destroyed.swap(true, Ordering::SeqCst) {
            let observers = std::mem::take(&mut *self.observers.lock());
            for observer in observers {
                observer();
            }
        }
    }
}

#[async_trait]
impl Surface for EdgeSurface {
    async fn load(&self, _locator: &ContentLocator) -> Result<(), SurfaceError> {
        Ok(())
    }

    fn show(&self) {}

    fn is_visible(&self) -> bool {
        !self.is_destroyed()
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn on_closed(&self, observer: CloseObserver) {
        if !self.is_destroyed() {
            self.observers.lock().push(observer);
        }
    }
}

#[derive(Clone, Default)]
struct EdgeFactory {
    created: Arc<Mutex<Option<Arc<EdgeSurface>>>>,
}

impl SurfaceFactory for EdgeFactory {
    fn create(&self, _options: &SurfaceOptions) -> Result<SurfaceHandle, SurfaceError> {
        let surface = Arc::new(EdgeSurface::default());
        *self.created.lock() = Some(Arc::clone(&surface));
        Ok(surface)
    }
}

/// Closes the surface from `after_load`, before the context starts observing it.
struct EarlyCloser {
    factory: EdgeFactory,
}

#[async_trait]
impl Plugin for EarlyCloser {
    fn name(&self) -> &str {
        "early-closer"
    }

    fn hooks(&self) -> &'static [Phase] {
        &[Phase::AfterLoad]
    }

    async fn after_load(&self, _ctx: &mut Context) -> HookResult {
        if let Some(surface) = self.factory.created.lock().as_ref() {
            surface.close();
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_surface_closed_during_after_load_is_released() {
    let factory = EdgeFactory::default();
    let orchestrator = Orchestrator::new(Arc::new(ReadinessGate::ready()), Arc::new(factory.clone()));

    let ctx = orchestrator
        .run(InitOptions::new("app://index.html").with_plugin(EarlyCloser {
            factory: factory.clone(),
        }))
        .await
        .unwrap();

    assert!(factory.created.lock().as_ref().unwrap().is_destroyed());
    assert!(ctx.surface().is_none());
    assert!(ctx.is_closed());
    assert_eq!(ctx.phase(), LifecyclePhase::Closed);
    assert!(ctx.hook_failures().is_empty());
}
