//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use anyhow::Context;
use cascade_core::EngineSettings;
use tracing::debug;

/// Build engine settings from the settings file, environment and flags
pub fn load_settings(cli: &Cli) -> anyhow::Result<EngineSettings> {
    let mut settings = match &cli.settings {
        Some(path) => EngineSettings::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => EngineSettings::default(),
    };
    settings
        .apply_env_overrides()
        .context("applying CASCADE_* environment overrides")?;
    if let Some(root) = &cli.root {
        settings.config_root = root.clone();
    }
    settings.validate()?;
    debug!(root = %settings.config_root.display(), "engine settings loaded");
    Ok(settings)
}

/// Route CLI commands to their respective handlers.
///
/// Settings are only loaded for commands that build an engine.
pub async fn route(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Validate { file } => commands::validate::run(file, cli.verbose).await,
        Commands::Resolve {
            target,
            force,
            format,
        } => commands::resolve::run(load_settings(&cli)?, target, *force, *format).await,
        Commands::Candidates { target } => commands::candidates::run(load_settings(&cli)?, target),
        Commands::Check => commands::check::run(load_settings(&cli)?, cli.verbose).await,
    }
}
