//! CLI parse: clap types for appinit. No behavior; definitions only.

use crate::surface::SurfaceMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// appinit - staged desktop application bootstrap
#[derive(Parser, Debug)]
#[command(name = "appinit")]
#[command(about = "Run the staged application bootstrap against a headless surface")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project root directory
    #[arg(long, default_value = ".")]
    pub project: PathBuf,

    /// Configuration file path (overrides default config loading)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Set by the login item when launched at boot
    #[arg(long, hide = true, global = true)]
    pub autostart: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run every bootstrap phase and print a JSON run summary
    Run {
        /// Content locator to load (overrides app.content)
        #[arg(long)]
        content: Option<String>,

        /// Surface mode: windowed, kiosk, fullscreen (overrides app.mode)
        #[arg(long)]
        mode: Option<SurfaceMode>,

        /// Exit with an error if any hook failed (unavailable collaborators excepted)
        #[arg(long)]
        strict: bool,
    },
    /// Print the merged surface options as JSON without running plugins
    Options {
        /// Surface mode: windowed, kiosk, fullscreen (overrides app.mode)
        #[arg(long)]
        mode: Option<SurfaceMode>,
    },
}
