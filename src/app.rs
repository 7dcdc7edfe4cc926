use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::Result;

pub struct AppContext {
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        // Project config is the nearest `crass.toml` at or above the working directory.
        let project_root = find_upwards(&cwd, PROJECT_CONFIG_FILE);
        let config = Config::load(cli.config.as_deref(), project_root.as_deref())?;

        Ok(Self {
            config,
            output_format: cli.output_format(),
        })
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        if dir.join(name).is_file() {
            return Some(dir.to_path_buf());
        }
        current = dir.parent();
    }
    None
}
