//! Rendering filtered CV trees into output documents.
//!
//! The [`Renderer`] trait turns a tree into HTML; PDF output is produced from
//! that HTML by an [`HtmlToPdf`] backend.

pub mod html;
pub mod pdf;
pub mod theme;

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::Result;

pub use html::HtmlRenderer;
pub use pdf::PdfConverter;
pub use theme::Theme;

/// Produces an HTML document from a filtered CV tree.
pub trait Renderer {
    fn render(&self, cv: &Value, theme: &Theme, options: &Mapping) -> Result<String>;
}

/// Converts a rendered HTML document into a PDF file.
pub trait HtmlToPdf {
    /// `workdir` is where relative links in the HTML resolve from.
    fn convert(&self, html: &str, output: &Path, workdir: &Path) -> Result<()>;
}
