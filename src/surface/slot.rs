//! Lifecycle slot holding the context's reference to the surface.
//!
//! `Empty -> Present -> Closed`, each transition at most once. The close
//! observer holds only a weak reference to the slot, so it neither keeps the
//! context alive nor fails if the context has already been dropped.

use super::{Surface, SurfaceHandle};
use crate::error::SurfaceError;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use tracing::debug;

enum SlotState {
    Empty,
    Present(SurfaceHandle),
    Closed,
}

#[derive(Clone)]
pub struct SurfaceSlot {
    state: Arc<Mutex<SlotState>>,
}

impl Default for SurfaceSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceSlot {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(SlotState::Empty)),
        }
    }

    /// Store the freshly created surface. Only one surface per slot.
    pub(crate) fn attach(&self, handle: SurfaceHandle) -> Result<(), SurfaceError> {
        let mut state = self.state.lock();
        match *state {
            SlotState::Empty => {
                *state = SlotState::Present(handle);
                Ok(())
            }
            SlotState::Present(_) | SlotState::Closed => Err(SurfaceError::CreationFailed(
                "a surface was already created for this context".to_string(),
            )),
        }
    }

    /// Current handle, or `None` before creation and after close.
    pub fn get(&self) -> Option<SurfaceHandle> {
        match &*self.state.lock() {
            SlotState::Present(handle) => Some(Arc::clone(handle)),
            SlotState::Empty | SlotState::Closed => None,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Present(_))
    }

    pub fn is_closed(&self) -> bool {
        matches!(*self.state.lock(), SlotState::Closed)
    }

    /// Clear the reference. Returns true only on the `Present -> Closed` transition.
    pub(crate) fn release(&self) -> bool {
        let mut state = self.state.lock();
        if matches!(*state, SlotState::Present(_)) {
            *state = SlotState::Closed;
            true
        } else {
            false
        }
    }

    /// Register the one-shot close observer that clears this slot.
    ///
    /// A surface that closed before registration may never notify late
    /// observers, so an already destroyed surface is released here.
    pub(crate) fn observe_close(&self, surface: &dyn Surface) {
        let weak: Weak<Mutex<SlotState>> = Arc::downgrade(&self.state);
        surface.on_closed(Box::new(move || {
            if let Some(state) = weak.upgrade() {
                let slot = SurfaceSlot { state };
                if slot.release() {
                    debug!("Surface closed; context reference cleared");
                }
            }
        }));
        if surface.is_destroyed() && self.release() {
            debug!("Surface closed before observation; context reference cleared");
        }
    }
}

impl std::fmt::Debug for SurfaceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock() {
            SlotState::Empty => "empty",
            SlotState::Present(_) => "present",
            SlotState::Closed => "closed",
        };
        f.debug_struct("SurfaceSlot").field("state", &state).finish()
    }
}
