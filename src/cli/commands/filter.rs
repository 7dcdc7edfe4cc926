//! crass filter - Print one vibe's filtered CV

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::build::{filter_vibe, to_yaml};
use crate::cli::commands::{InputArgs, load_inputs};
use crate::cli::output::{OutputFormat, emit_json, robot_ok};
use crate::core::UnknownSlug;
use crate::error::{CrassError, Result};

#[derive(Args, Debug)]
pub struct FilterArgs {
    /// Name of the vibe to apply
    pub vibe: String,

    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Serialize)]
struct FilterReport<'a> {
    vibe: &'a str,
    cv: &'a serde_yaml::Value,
    unknown_slugs: &'a [UnknownSlug],
}

pub fn run(ctx: &AppContext, args: &FilterArgs) -> Result<()> {
    let (cv, vibes) = load_inputs(ctx, &args.input)?;
    let vibe = vibes
        .get(&args.vibe)
        .ok_or_else(|| CrassError::NotFound(format!("no vibe named '{}'", args.vibe)))?;
    let outcome = filter_vibe(&cv, vibe)?;

    match ctx.output_format {
        OutputFormat::Json => emit_json(
            &robot_ok(FilterReport {
                vibe: &vibe.name,
                cv: &outcome.value,
                unknown_slugs: &outcome.warnings,
            })
            .with_warnings(outcome.warnings.iter().map(ToString::to_string).collect()),
        ),
        OutputFormat::Human => {
            for warning in &outcome.warnings {
                eprintln!("warning: {warning}");
            }
            print!("{}", to_yaml(&outcome.value)?);
            Ok(())
        }
    }
}
