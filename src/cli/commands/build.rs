//! crass build - Filter and render vibes

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use crate::app::AppContext;
use crate::build::{BuildOptions, BuildReport, Builder};
use crate::cli::commands::{InputArgs, load_inputs};
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, robot_ok, robot_partial};
use crate::error::{CrassError, Result};
use crate::render::{HtmlRenderer, PdfConverter};

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only build these vibes (repeatable; default: all)
    #[arg(long)]
    pub vibe: Vec<String>,

    /// Directory for outputs given as a bare kind
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

pub fn run(ctx: &AppContext, args: &BuildArgs) -> Result<()> {
    let (cv, vibes) = load_inputs(ctx, &args.input)?;
    let selected = vibes.select(&args.vibe)?;
    debug!(target: "build", count = selected.len(), "vibes selected");

    let options = BuildOptions {
        out_dir: args
            .out_dir
            .clone()
            .unwrap_or_else(|| ctx.config.build.out_dir.clone()),
        default_theme: ctx.config.build.theme.clone(),
    };
    let renderer = HtmlRenderer::new();
    let pdf = PdfConverter::from_config(&ctx.config.pdf);
    let report = Builder::new(&cv, &renderer, &pdf, options).build(&selected);

    match ctx.output_format {
        OutputFormat::Json => {
            let failed = report.failed();
            if failed == 0 {
                emit_json(&robot_ok(&report))?;
            } else {
                emit_json(&robot_partial(&report, report.vibes.len() - failed, failed))?;
            }
        }
        OutputFormat::Human => emit_human(human_report(&report)),
    }

    match report.failed() {
        0 => Ok(()),
        failed => Err(CrassError::ValidationFailed(format!(
            "{failed} of {} vibes failed",
            report.vibes.len()
        ))),
    }
}

fn human_report(report: &BuildReport) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("Build");
    for vibe in &report.vibes {
        layout.section(&vibe.name);
        for output in &vibe.written {
            layout.bullet(&format!("created {}", output.path.display()));
        }
        for raw in &vibe.skipped {
            layout.warning(&format!("output '{raw}' has no instructions to make; skipped"));
        }
        for warning in &vibe.warnings {
            layout.warning(warning);
        }
        for error in &vibe.errors {
            layout.error(error);
        }
        layout.blank();
    }
    layout.kv("Outputs", &report.written().to_string());
    layout.kv("Failed vibes", &report.failed().to_string());
    layout
}
