//! crass slugs - List resolved slugs

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::commands::load_resolved_cv;
use crate::cli::output::{HumanLayout, OutputFormat, emit_human, emit_json, robot_ok};
use crate::core::collect_slugs;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct SlugsArgs {
    /// CV document (.yaml, .yml or .json)
    #[arg(long, default_value = "cv.yaml")]
    pub cv: PathBuf,

    /// Only show slugs under this top-level section
    #[arg(long)]
    pub section: Option<String>,
}

pub fn run(ctx: &AppContext, args: &SlugsArgs) -> Result<()> {
    let cv = load_resolved_cv(ctx, &args.cv)?;
    let entries = collect_slugs(&cv)
        .into_iter()
        .filter(|entry| {
            args.section.as_deref().is_none_or(|section| {
                entry
                    .path
                    .strip_prefix(section)
                    .is_some_and(|rest| rest.starts_with(['[', '.']))
            })
        })
        .collect::<Vec<_>>();

    match ctx.output_format {
        OutputFormat::Json => emit_json(&robot_ok(&entries)),
        OutputFormat::Human => {
            let mut layout = HumanLayout::new();
            layout.title("Slugs");
            if entries.is_empty() {
                layout.bullet("(none)");
            }
            for entry in &entries {
                layout.kv(&entry.path, &entry.slug);
            }
            emit_human(layout);
            Ok(())
        }
    }
}
