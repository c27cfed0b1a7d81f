//! `cascade candidates`

use super::request_from;
use crate::args::TargetArgs;
use crate::console::CliConsole;
use cascade_core::{ConfigResolutionEngine, EngineSettings};
use colored::*;

pub fn run(settings: EngineSettings, target: &TargetArgs) -> anyhow::Result<()> {
    let console = CliConsole::new(true);
    let request = request_from(target)?;
    let engine = ConfigResolutionEngine::new(settings);
    let steps = engine.candidates(&request)?;

    console.print_header(&format!("Cascade for {}", request));
    for (index, step) in steps.iter().enumerate() {
        let coord = &step.coordinate;
        let path = engine
            .loader()
            .path_for(&coord.module, &coord.profile, coord.version);
        let marker = if path.exists() {
            "●".green()
        } else {
            "○".dimmed()
        };
        println!(
            "{} {}. {:<13} {}",
            marker,
            index + 1,
            format!("{:?}", step.level),
            coord.canonical_id()
        );
        println!("      {}", path.display().to_string().dimmed());
    }
    Ok(())
}
