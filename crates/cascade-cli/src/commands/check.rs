//! `cascade check`

use crate::console::CliConsole;
use cascade_core::{ConfigResolutionEngine, EngineSettings};

pub async fn run(settings: EngineSettings, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Engine Check");
    console.info(&format!(
        "Configuration root: {}",
        settings.config_root.display()
    ));

    let engine = ConfigResolutionEngine::new(settings);
    if let Err(e) = engine.init().await {
        console.error(&e.to_string());
        return Err(e.into());
    }
    console.success("Universal base fallback present and valid");

    let stats = engine.stats();
    console.field("initialized", stats.initialized);
    console.field("shared tier available", stats.shared_tier_available);
    console.field("local cache capacity", stats.local.max_size);
    console.field("local cache ttl (s)", engine.settings().local.ttl_secs);
    if !stats.shared_tier_available {
        console.warn("Running with file and local cache only");
    }

    engine.close().await;
    Ok(())
}
