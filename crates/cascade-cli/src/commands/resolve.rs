//! `cascade resolve`

use super::request_from;
use crate::args::{OutputFormat, TargetArgs};
use cascade_core::{ConfigResolutionEngine, EngineSettings};

pub async fn run(
    settings: EngineSettings,
    target: &TargetArgs,
    force: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let request = request_from(target)?;
    let engine = ConfigResolutionEngine::new(settings);
    engine.init().await?;

    let result = engine.load_config(&request, force).await;
    engine.close().await;
    let resolved = result?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&resolved)?,
        OutputFormat::Yaml => serde_yaml::to_string(&resolved)?,
    };
    println!("{}", rendered);
    Ok(())
}
