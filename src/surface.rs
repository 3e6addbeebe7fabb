//! Surface Abstraction
//!
//! The displayable window/view created mid-sequence. Creation and rendering are
//! platform concerns behind [`SurfaceFactory`] and [`Surface`]; this module owns
//! the construction options and the lifecycle slot the context refers through.

use crate::context::types::ContentLocator;
use crate::error::SurfaceError;
use async_trait::async_trait;
use std::sync::Arc;

mod options;
mod slot;

pub use options::{
    merge_surface_options, PendingSurface, SurfaceMode, SurfaceOptions, DEFAULT_BACKGROUND_COLOR,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
pub use slot::SurfaceSlot;

/// Callback fired once when the surface is closed.
pub type CloseObserver = Box<dyn FnOnce() + Send + 'static>;

/// Shared handle to a created surface.
pub type SurfaceHandle = Arc<dyn Surface>;

/// A created window or view.
#[async_trait]
pub trait Surface: Send + Sync {
    /// Load content into the surface.
    async fn load(&self, locator: &ContentLocator) -> Result<(), SurfaceError>;

    /// Make the surface visible. No-op if already visible.
    fn show(&self);

    fn is_visible(&self) -> bool;

    fn is_destroyed(&self) -> bool;

    /// Subscribe to the "closed" event. Observers fire at most once, and
    /// need not fire at all when added after the surface was destroyed.
    fn on_closed(&self, observer: CloseObserver);
}

/// Creates surfaces from merged construction options.
pub trait SurfaceFactory: Send + Sync {
    fn create(&self, options: &SurfaceOptions) -> Result<SurfaceHandle, SurfaceError>;
}
