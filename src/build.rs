//! The build pipeline: filter and render each vibe of a resolved CV.
//!
//! Vibes are independent. A failure in one vibe (bad theme, filter that does
//! not fit the CV, converter error) is recorded in its report and the others
//! still build.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_yaml::Value;
use tracing::{info, warn};

use crate::core::filter::{FilterOutcome, apply_filter};
use crate::core::slug::claim_unique;
use crate::core::vibe::{OutputKind, OutputTarget, Overwrite, Vibe};
use crate::core::CurriculumVitae;
use crate::error::Result;
use crate::render::{HtmlToPdf, Renderer, Theme};
use crate::utils::fs::{copy_tree, ensure_dir, ensure_parent};

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Directory for outputs given as a bare kind (`html`, `pdf`).
    pub out_dir: PathBuf,
    /// Theme for vibes that name none; the built-in theme when unset.
    pub default_theme: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WrittenOutput {
    pub kind: OutputKind,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct VibeReport {
    pub name: String,
    pub written: Vec<WrittenOutput>,
    /// Output entries that were not understood and skipped.
    pub skipped: Vec<String>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl VibeReport {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            written: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub vibes: Vec<VibeReport>,
}

impl BuildReport {
    #[must_use]
    pub fn failed(&self) -> usize {
        self.vibes.iter().filter(|vibe| !vibe.is_ok()).count()
    }

    #[must_use]
    pub fn written(&self) -> usize {
        self.vibes.iter().map(|vibe| vibe.written.len()).sum()
    }
}

/// Filter `vibe` against `cv`, logging the warnings and noting an ignored `overwrite`.
pub fn filter_vibe(cv: &CurriculumVitae, vibe: &Vibe) -> Result<FilterOutcome> {
    if let Overwrite::NotImplemented(_) = vibe.overwrite {
        warn!(vibe = %vibe.name, "'overwrite' is not implemented yet; ignoring it");
    }
    apply_filter(cv.as_value(), &vibe.filter)
}

pub struct Builder<'a> {
    cv: &'a CurriculumVitae,
    renderer: &'a dyn Renderer,
    pdf: &'a dyn HtmlToPdf,
    options: BuildOptions,
    claimed: RefCell<ClaimedOutputs>,
}

/// File stems and paths already handed out by this builder.
#[derive(Debug, Default)]
struct ClaimedOutputs {
    stems: HashSet<String>,
    paths: HashSet<PathBuf>,
}

impl<'a> Builder<'a> {
    /// `cv` must already have its slugs resolved.
    pub fn new(
        cv: &'a CurriculumVitae,
        renderer: &'a dyn Renderer,
        pdf: &'a dyn HtmlToPdf,
        options: BuildOptions,
    ) -> Self {
        Self {
            cv,
            renderer,
            pdf,
            options,
            claimed: RefCell::new(ClaimedOutputs::default()),
        }
    }

    pub fn build(&self, vibes: &[&Vibe]) -> BuildReport {
        BuildReport {
            vibes: vibes.iter().map(|vibe| self.build_vibe(vibe)).collect(),
        }
    }

    pub fn build_vibe(&self, vibe: &Vibe) -> VibeReport {
        let mut report = VibeReport::new(&vibe.name);
        if let Err(err) = self.try_build_vibe(vibe, &mut report) {
            warn!(vibe = %vibe.name, error = %err, "vibe failed");
            report.errors.push(err.to_string());
        }
        report
    }

    fn try_build_vibe(&self, vibe: &Vibe, report: &mut VibeReport) -> Result<()> {
        if let Overwrite::NotImplemented(_) = vibe.overwrite {
            report
                .warnings
                .push("'overwrite' is not implemented yet; ignored".to_string());
        }

        let outcome = filter_vibe(self.cv, vibe)?;
        report
            .warnings
            .extend(outcome.warnings.iter().map(ToString::to_string));

        let targets = self.plan_outputs(vibe, report);
        if targets.is_empty() {
            warn!(vibe = %vibe.name, "no supported outputs requested");
            return Ok(());
        }

        let theme_dir = vibe.theme.as_ref().or(self.options.default_theme.as_ref());
        let theme = match theme_dir {
            Some(dir) => Theme::load(dir)?,
            None => Theme::builtin(),
        };
        let options = theme.merged_options(&vibe.theme_options);
        let html = self.renderer.render(&outcome.value, &theme, &options)?;

        let mut prepared = HashSet::new();
        for (kind, path) in targets {
            let dir = path
                .parent()
                .filter(|dir| !dir.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            if prepared.insert(dir.clone()) {
                prepare_dir(&dir, &theme, vibe)?;
            }
            match write_output(kind, &path, &dir, &html, self.pdf) {
                Ok(()) => {
                    info!(vibe = %vibe.name, path = %path.display(), "created {kind}");
                    report.written.push(WrittenOutput { kind, path });
                }
                Err(err) => {
                    warn!(vibe = %vibe.name, path = %path.display(), error = %err, "output failed");
                    report.errors.push(format!("{}: {err}", path.display()));
                }
            }
        }
        Ok(())
    }

    /// Resolve output paths. No two outputs of one builder share a path: bare
    /// kinds get a suffixed stem, explicit paths already taken are refused.
    fn plan_outputs(&self, vibe: &Vibe, report: &mut VibeReport) -> Vec<(OutputKind, PathBuf)> {
        let mut claimed = self.claimed.borrow_mut();
        let mut stem = None;
        let mut targets = Vec::new();
        for target in &vibe.outputs {
            let (kind, path) = match target {
                OutputTarget::Kind(kind) => {
                    let name = stem.get_or_insert_with(|| {
                        let wanted = vibe.file_stem();
                        let unique = claim_unique(wanted.clone(), &mut claimed.stems);
                        if unique != wanted {
                            warn!(vibe = %vibe.name, stem = %unique, "output name already used in this build");
                            report.warnings.push(format!(
                                "output name '{wanted}' is already used in this build; writing '{unique}' instead"
                            ));
                        }
                        unique
                    });
                    (*kind, self.options.out_dir.join(format!("{name}.{}", kind.extension())))
                }
                OutputTarget::File { kind, path } => (*kind, path.clone()),
                OutputTarget::Unsupported(raw) => {
                    warn!(vibe = %vibe.name, output = %raw, "output type has no instructions to make; skipping");
                    report.skipped.push(raw.clone());
                    continue;
                }
            };
            if claimed.paths.insert(path.clone()) {
                targets.push((kind, path));
            } else {
                warn!(vibe = %vibe.name, path = %path.display(), "output path already written in this build");
                report.errors.push(format!(
                    "{}: already produced by another output in this build; skipped",
                    path.display()
                ));
            }
        }
        targets
    }
}

fn prepare_dir(dir: &Path, theme: &Theme, vibe: &Vibe) -> Result<()> {
    ensure_dir(dir)?;
    if let Some(includes) = &theme.includes {
        copy_tree(includes, dir)?;
    }
    if let Some(includes) = &vibe.includes {
        copy_tree(includes, dir)?;
    }
    Ok(())
}

fn write_output(
    kind: OutputKind,
    path: &Path,
    workdir: &Path,
    html: &str,
    pdf: &dyn HtmlToPdf,
) -> Result<()> {
    ensure_parent(path)?;
    match kind {
        OutputKind::Html => std::fs::write(path, html).map_err(Into::into),
        OutputKind::Pdf => pdf.convert(html, path, workdir),
    }
}

/// Serialize a filtered tree for display.
pub fn to_yaml(value: &Value) -> Result<String> {
    Ok(serde_yaml::to_string(value)?)
}
