//! HTML to PDF through an external wkhtmltopdf-compatible binary.

use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::config::PdfConfig;
use crate::error::{CrassError, Result};

use super::HtmlToPdf;

#[derive(Debug, Clone)]
pub struct PdfConverter {
    command: PathBuf,
    page_size: String,
    extra_args: Vec<String>,
}

impl PdfConverter {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            page_size: "A4".to_string(),
            extra_args: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            command: PathBuf::from(&config.command),
            page_size: config.page_size.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn resolve_binary(&self) -> Result<PathBuf> {
        which::which(&self.command).map_err(|err| {
            CrassError::Render(format!(
                "pdf converter '{}' not found: {err}",
                self.command.display()
            ))
        })
    }

    fn arguments(&self, input: &Path, output: &Path) -> Vec<String> {
        let mut args = vec![
            "--quiet".to_string(),
            "--page-size".to_string(),
            self.page_size.clone(),
        ];
        for margin in ["--margin-top", "--margin-right", "--margin-bottom", "--margin-left"] {
            args.push(margin.to_string());
            args.push("0".to_string());
        }
        args.extend(
            ["--encoding", "UTF-8", "--enable-local-file-access", "--keep-relative-links"]
                .iter()
                .map(ToString::to_string),
        );
        args.extend(self.extra_args.iter().cloned());
        args.push(input.display().to_string());
        args.push(output.display().to_string());
        args
    }
}

impl HtmlToPdf for PdfConverter {
    fn convert(&self, html: &str, output: &Path, workdir: &Path) -> Result<()> {
        let binary = self.resolve_binary()?;

        // The HTML must live in workdir so relative links to copied includes resolve.
        let mut input = tempfile::Builder::new()
            .prefix(".crass-")
            .suffix(".html")
            .tempfile_in(workdir)?;
        input.write_all(html.as_bytes())?;
        input.flush()?;

        let args = self.arguments(input.path(), output);
        debug!(binary = %binary.display(), ?args, "running pdf converter");
        let result = Command::new(&binary)
            .args(&args)
            .current_dir(workdir)
            .output()
            .map_err(|err| CrassError::Render(format!("run {}: {err}", binary.display())))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(CrassError::Render(format!(
                "{} exited with {}: {}",
                binary.display(),
                result.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}
