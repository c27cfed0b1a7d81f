//! `cascade validate`

use crate::console::CliConsole;
use anyhow::Context;
use cascade_core::loader::parse_document;
use std::path::Path;

pub async fn run(file: &Path, verbose: bool) -> anyhow::Result<()> {
    let console = CliConsole::new(verbose);
    console.print_header("Configuration Validation");

    let content = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    match parse_document(&content, file) {
        Ok(document) => {
            console.success(&format!("{} is valid", file.display()));
            console.field("provider", &document.provider);
            console.field("model", &document.model);
            if document.metadata.deprecated {
                console.warn("Document is marked deprecated");
            }
            Ok(())
        }
        Err(e) => {
            console.error(&e.to_string());
            Err(e.into())
        }
    }
}
