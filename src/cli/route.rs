//! CLI route: run context and command dispatch.

use crate::cli::output::run_summary;
use crate::cli::parse::Commands;
use crate::config::{AppInitConfig, ConfigLoader};
use crate::context::{FailureKind, LifecyclePhase};
use crate::error::InitError;
use crate::headless::HeadlessSurfaceFactory;
use crate::orchestrator::{InitOptions, Orchestrator};
use crate::plugins::{build_plugins, Collaborators};
use crate::readiness::ReadinessGate;
use crate::surface::{merge_surface_options, PendingSurface, SurfaceMode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Runtime context for CLI execution: loaded configuration and collaborators.
pub struct RunContext {
    config: AppInitConfig,
    collaborators: Collaborators,
}

impl RunContext {
    /// Load and validate configuration from the project root or an explicit file.
    pub fn new(project_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, InitError> {
        let config = ConfigLoader::load_validated(&project_root, config_path.as_deref())?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: AppInitConfig) -> Self {
        Self {
            config,
            collaborators: Collaborators::default(),
        }
    }

    /// Replace the platform collaborators handed to the built-in plugins.
    pub fn with_collaborators(mut self, collaborators: Collaborators) -> Self {
        self.collaborators = collaborators;
        self
    }

    pub fn config(&self) -> &AppInitConfig {
        &self.config
    }

    pub async fn execute(&self, command: &Commands) -> Result<String, InitError> {
        match command {
            Commands::Run {
                content,
                mode,
                strict,
            } => self.run(content.clone(), *mode, *strict).await,
            Commands::Options { mode } => self.options(*mode),
        }
    }

    async fn run(
        &self,
        content: Option<String>,
        mode: Option<SurfaceMode>,
        strict: bool,
    ) -> Result<String, InitError> {
        let mut config = self.config.clone();
        if let Some(content) = content {
            config.app.content = content;
        }
        if let Some(mode) = mode {
            config.app.mode = mode;
        }

        let factory = Arc::new(HeadlessSurfaceFactory::new());
        let orchestrator = Orchestrator::new(Arc::new(ReadinessGate::ready()), factory.clone());
        let options = InitOptions::new(config.app.content_locator())
            .with_settings(config.settings.clone())
            .with_boxed_plugins(build_plugins(&config, &self.collaborators));

        let ctx = orchestrator.run(options).await?;
        info!(phase = %ctx.phase(), "Run finished");

        if strict {
            if let Some(failure) = ctx
                .hook_failures()
                .iter()
                .find(|failure| failure.kind != FailureKind::Unavailable)
            {
                return Err(failure.clone().into());
            }
        }
        if ctx.phase() != LifecyclePhase::Ready {
            warn!(phase = %ctx.phase(), "Surface closed before the run summary");
        }

        let summary = run_summary(&ctx, factory.last().as_deref());
        Ok(serde_json::to_string_pretty(&summary)?)
    }

    fn options(&self, mode: Option<SurfaceMode>) -> Result<String, InitError> {
        let pending = PendingSurface::new(
            mode.unwrap_or(self.config.app.mode),
            self.config.window.clone(),
        );
        let merged = merge_surface_options(&pending, &self.config.settings);
        Ok(serde_json::to_string_pretty(&merged)?)
    }
}
