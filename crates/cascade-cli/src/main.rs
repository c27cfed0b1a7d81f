//! Cascade configuration resolver CLI
//!
//! Operate and debug a configuration tree from the command line.
//!
//! # Installation
//!
//! ```bash
//! cargo install --path crates/cascade-cli
//! ```
//!
//! # Commands
//!
//! - `cascade resolve hrkg:extraction` resolves a logical name and prints it
//! - `cascade candidates hrkg:extraction` shows the fallback order and files
//! - `cascade check` verifies the base fallback and prints engine stats
//! - `cascade validate <file>` parses and schema-checks a single file
//!
//! Set `RUST_LOG=debug` (or pass `--verbose`) for detailed logging.

mod args;
mod commands;
mod console;
mod router;

use args::{Cli, LogFormat};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    router::route(cli).await
}
