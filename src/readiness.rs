//! Readiness Gate
//!
//! One-shot signal raised by the platform once it can create surfaces. The
//! orchestrator suspends on it between `before_ready` and `after_ready`. There
//! is no timeout: a platform that never signals leaves the caller suspended.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::debug;

/// Source of the platform readiness signal.
#[async_trait]
pub trait ReadinessProvider: Send + Sync {
    /// Resolves once the platform is ready. Resolves immediately on every call
    /// after the first resolution.
    async fn wait_ready(&self);
}

/// Platform-side half: resolves the gate.
#[derive(Debug)]
pub struct ReadinessSignal {
    tx: watch::Sender<bool>,
}

/// Orchestrator-side half: awaited until resolved.
#[derive(Debug, Clone)]
pub struct ReadinessGate {
    rx: watch::Receiver<bool>,
}

/// Create a connected signal/gate pair.
pub fn readiness_channel() -> (ReadinessSignal, ReadinessGate) {
    let (tx, rx) = watch::channel(false);
    (ReadinessSignal { tx }, ReadinessGate { rx })
}

impl ReadinessSignal {
    /// Resolve the gate. Returns true on the first call, false afterwards.
    pub fn signal(&self) -> bool {
        let resolved = self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        });
        if resolved {
            debug!("Platform readiness signalled");
        }
        resolved
    }
}

impl ReadinessGate {
    /// A gate that is already resolved.
    pub fn ready() -> Self {
        let (signal, gate) = readiness_channel();
        signal.signal();
        gate
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }
}

#[async_trait]
impl ReadinessProvider for ReadinessGate {
    async fn wait_ready(&self) {
        let mut rx = self.rx.clone();
        if rx.wait_for(|ready| *ready).await.is_err() {
            // Signal dropped without resolving: the platform never becomes ready.
            futures::future::pending::<()>().await;
        }
    }
}
