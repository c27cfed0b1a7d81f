//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cascade")]
#[command(about = "Resolve layered configuration with cascade fallback")]
#[command(version)]
pub struct Cli {
    /// Engine settings file (TOML, YAML or JSON)
    #[arg(long, global = true, env = "CASCADE_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Configuration root, overriding settings and environment
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a logical name and print the resolved configuration
    Resolve {
        #[command(flatten)]
        target: TargetArgs,

        /// Skip both cache tiers
        #[arg(long)]
        force: bool,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: OutputFormat,
    },

    /// Show the cascade candidates and the file each maps to
    Candidates {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Verify the universal base fallback and print engine stats
    Check,

    /// Parse and schema-check a single configuration file
    Validate {
        /// File to validate
        file: PathBuf,
    },
}

/// Request coordinates shared by `resolve` and `candidates`
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Logical name, `module:profile`
    pub name: String,

    /// Scope (defaults to the settings' default scope)
    #[arg(long)]
    pub scope: Option<String>,

    /// Per-user override id
    #[arg(long)]
    pub user: Option<String>,

    /// Configuration version
    #[arg(long = "config-version", default_value_t = 1)]
    pub version: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}
