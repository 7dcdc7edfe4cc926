//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use tracing::debug;

pub mod build;
pub mod filter;
pub mod slugs;
pub mod validate;

use crate::app::AppContext;
use crate::core::{CurriculumVitae, VibesFile, resolve_slugs};
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter and render vibes into output files
    Build(build::BuildArgs),

    /// Print the filtered CV for one vibe
    Filter(filter::FilterArgs),

    /// List the resolved slug of every CV list item
    Slugs(slugs::SlugsArgs),

    /// Check the CV and vibes without rendering anything
    Validate(validate::ValidateArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Build(args) => build::run(ctx, args),
        Commands::Filter(args) => filter::run(ctx, args),
        Commands::Slugs(args) => slugs::run(ctx, args),
        Commands::Validate(args) => validate::run(ctx, args),
    }
}

/// Input documents shared by commands that need both the CV and the vibes.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// CV document (.yaml, .yml or .json)
    #[arg(long, default_value = "cv.yaml")]
    pub cv: PathBuf,

    /// Vibes document (.yaml, .yml or .json)
    #[arg(long, default_value = "vibes.yaml")]
    pub vibes: PathBuf,
}

/// Load the CV and resolve its slugs once, before any vibe is touched.
pub(crate) fn load_resolved_cv(ctx: &AppContext, path: &Path) -> Result<CurriculumVitae> {
    let cv = CurriculumVitae::load(path)?;
    let resolved = resolve_slugs(&cv, &ctx.config.slug_rules())?;
    debug!(path = %path.display(), sections = ?resolved.sections(), "resolved cv");
    Ok(resolved)
}

pub(crate) fn load_inputs(ctx: &AppContext, input: &InputArgs) -> Result<(CurriculumVitae, VibesFile)> {
    let cv = load_resolved_cv(ctx, &input.cv)?;
    let vibes = VibesFile::load(&input.vibes)?;
    Ok((cv, vibes))
}
