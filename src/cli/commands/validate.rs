//! crass validate - Check the CV and vibes without rendering

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::build::filter_vibe;
use crate::cli::commands::{InputArgs, load_inputs};
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, robot_ok};
use crate::core::{CurriculumVitae, Vibe, VibesFile, collect_slugs};
use crate::error::{CrassError, Result};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<()> {
    let (cv, vibes) = load_inputs(ctx, &args.input)?;
    let report = build_report(&cv, &vibes);

    if ctx.output_format == OutputFormat::Json {
        emit_json(&robot_ok(&report))?;
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Validation");
        layout.kv("CV", &args.input.cv.display().to_string());
        layout.kv("Vibes", &args.input.vibes.display().to_string());
        layout.kv("Slugs", &report.slugs.to_string());

        for name in &report.duplicate_names {
            layout.warning(&format!("vibe name '{name}' is used more than once"));
        }
        for vibe in &report.vibes {
            layout.section(&vibe.name);
            for raw in &vibe.unsupported_outputs {
                layout.warning(&format!("output '{raw}' is not supported (expected html|pdf)"));
            }
            for warning in &vibe.warnings {
                layout.warning(warning);
            }
            if let Some(error) = &vibe.error {
                layout.error(error);
            } else if vibe.unsupported_outputs.is_empty() && vibe.warnings.is_empty() {
                layout.bullet("OK");
            }
        }
        emit_human(layout);
    }

    if report.clean {
        Ok(())
    } else {
        let failed = report.vibes.iter().filter(|vibe| vibe.error.is_some()).count();
        Err(CrassError::ValidationFailed(format!(
            "{failed} vibe(s) cannot be built"
        )))
    }
}

#[derive(Serialize)]
struct ValidateReport {
    slugs: usize,
    duplicate_names: Vec<String>,
    vibes: Vec<VibeCheck>,
    clean: bool,
}

#[derive(Serialize)]
struct VibeCheck {
    name: String,
    unsupported_outputs: Vec<String>,
    warnings: Vec<String>,
    error: Option<String>,
}

fn build_report(cv: &CurriculumVitae, vibes: &VibesFile) -> ValidateReport {
    let checks = vibes.vibes().iter().map(|vibe| check_vibe(cv, vibe)).collect::<Vec<_>>();
    let clean = checks.iter().all(|check| check.error.is_none());
    ValidateReport {
        slugs: collect_slugs(cv).len(),
        duplicate_names: vibes
            .duplicate_names()
            .into_iter()
            .map(ToString::to_string)
            .collect(),
        vibes: checks,
        clean,
    }
}

fn check_vibe(cv: &CurriculumVitae, vibe: &Vibe) -> VibeCheck {
    let (warnings, error) = match filter_vibe(cv, vibe) {
        Ok(outcome) => (
            outcome.warnings.iter().map(ToString::to_string).collect(),
            None,
        ),
        Err(err) => (Vec::new(), Some(err.to_string())),
    };
    VibeCheck {
        name: vibe.name.clone(),
        unsupported_outputs: vibe.unsupported_outputs().map(ToString::to_string).collect(),
        warnings,
        error,
    }
}
