//! Command-line interface.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "crass",
    version,
    about = "Build filtered variants (vibes) of a YAML/JSON curriculum vitae"
)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Machine-readable JSON output and JSON logs
    #[arg(long, global = true, env = "CRASS_ROBOT")]
    pub robot: bool,

    /// Output format (robot mode implies json)
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,

    /// Path to a config file (defaults to global + project crass.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Json
        } else {
            self.format
        }
    }
}
