//! Headless Surface
//!
//! In-process surface and factory with no native window behind them. Used by the
//! CLI to exercise a full bootstrap without a display, and by tests to observe
//! what the orchestrator did to the surface.

use crate::context::types::ContentLocator;
use crate::error::SurfaceError;
use crate::surface::{CloseObserver, Surface, SurfaceFactory, SurfaceHandle, SurfaceOptions};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// A surface that records everything done to it.
#[derive(Default)]
pub struct HeadlessSurface {
    options: SurfaceOptions,
    visible: AtomicBool,
    destroyed: AtomicBool,
    show_calls: AtomicUsize,
    loads: Mutex<Vec<String>>,
    observers: Mutex<Vec<CloseObserver>>,
    load_failure: Option<String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: SurfaceOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Surface whose every load fails with `reason`.
    pub fn failing(options: SurfaceOptions, reason: impl Into<String>) -> Self {
        Self {
            options,
            load_failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Options the surface was created with.
    pub fn options(&self) -> &SurfaceOptions {
        &self.options
    }

    /// Locators passed to `load`, in order.
    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().clone()
    }

    pub fn show_calls(&self) -> usize {
        self.show_calls.load(Ordering::SeqCst)
    }

    /// Simulate the user closing the surface. Observers fire exactly once.
    pub fn close(&self) {
        if self.destroyed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.visible.store(false, Ordering::SeqCst);
        let observers: Vec<CloseObserver> = std::mem::take(&mut *self.observers.lock());
        debug!(observers = observers.len(), "Headless surface closed");
        for observer in observers {
            observer();
        }
    }
}

#[async_trait]
impl Surface for HeadlessSurface {
    async fn load(&self, locator: &ContentLocator) -> Result<(), SurfaceError> {
        if self.is_destroyed() {
            return Err(SurfaceError::Destroyed);
        }
        let url = locator.to_string();
        self.loads.lock().push(url.clone());
        match &self.load_failure {
            Some(reason) => Err(SurfaceError::LoadFailed {
                locator: url,
                reason: reason.clone(),
            }),
            None => {
                info!(locator = %url, "Headless surface loaded content");
                Ok(())
            }
        }
    }

    fn show(&self) {
        self.show_calls.fetch_add(1, Ordering::SeqCst);
        if !self.is_destroyed() {
            self.visible.store(true, Ordering::SeqCst);
        }
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    fn on_closed(&self, observer: CloseObserver) {
        if self.is_destroyed() {
            observer();
            return;
        }
        self.observers.lock().push(observer);
    }
}

/// Factory producing [`HeadlessSurface`]s and remembering each one.
#[derive(Default)]
pub struct HeadlessSurfaceFactory {
    created: Mutex<Vec<Arc<HeadlessSurface>>>,
    load_failure: Option<String>,
    show_on_create: bool,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every surface from this factory fails to load with `reason`.
    pub fn failing_loads(reason: impl Into<String>) -> Self {
        Self {
            load_failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Surfaces start out visible, as when `show` is set in the options.
    pub fn visible_on_create(mut self) -> Self {
        self.show_on_create = true;
        self
    }

    /// Surfaces created so far.
    pub fn created(&self) -> Vec<Arc<HeadlessSurface>> {
        self.created.lock().clone()
    }

    /// The most recently created surface.
    pub fn last(&self) -> Option<Arc<HeadlessSurface>> {
        self.created.lock().last().cloned()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&self, options: &SurfaceOptions) -> Result<SurfaceHandle, SurfaceError> {
        let surface = match &self.load_failure {
            Some(reason) => HeadlessSurface::failing(options.clone(), reason.clone()),
            None => HeadlessSurface::with_options(options.clone()),
        };
        if self.show_on_create {
            surface.visible.store(true, Ordering::SeqCst);
        }
        let surface = Arc::new(surface);
        self.created.lock().push(Arc::clone(&surface));
        debug!(
            width = ?options.width,
            height = ?options.height,
            "Headless surface created"
        );
        let handle: SurfaceHandle = surface;
        Ok(handle)
    }
}
