//! appinit: Staged Desktop Application Bootstrap
//!
//! Runs independently authored plugins through a fixed sequence of lifecycle
//! phases, creating and loading a single application surface along the way.
//! Platform mechanics (readiness, surface creation) sit behind traits so the
//! engine runs headless in tests and in the `appinit` CLI.

pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod headless;
pub mod logging;
pub mod orchestrator;
pub mod plugin;
pub mod plugins;
pub mod readiness;
pub mod surface;

pub use context::{Context, HookFailure, LifecyclePhase};
pub use error::{InitError, PluginError, SurfaceError};
pub use orchestrator::{InitOptions, Orchestrator};
pub use plugin::{Phase, Plugin};
