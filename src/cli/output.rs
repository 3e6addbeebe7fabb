//! CLI output: run summaries and error mapping.

use crate::context::Context;
use crate::error::InitError;
use crate::headless::HeadlessSurface;
use serde_json::{json, Value};

/// Map orchestrator errors to a string for CLI output.
pub fn map_error(e: &InitError) -> String {
    e.to_string()
}

/// JSON summary of a finished run.
pub fn run_summary(ctx: &Context, surface: Option<&HeadlessSurface>) -> Value {
    json!({
        "finished_at": chrono::Utc::now().to_rfc3339(),
        "phase": ctx.phase(),
        "content": ctx.content_locator().to_string(),
        "surface_options": ctx.surface_options(),
        "settings": ctx.settings(),
        "loads": surface.map(|s| s.loads()).unwrap_or_default(),
        "show_calls": surface.map(|s| s.show_calls()).unwrap_or_default(),
        "hook_failures": ctx.hook_failures(),
        "load_failure": ctx.load_failure(),
    })
}
