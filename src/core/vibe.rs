//! Vibes: named rendering variants of a CV.
//!
//! A vibes file is a YAML/JSON list of entries like
//!
//! ```yaml
//! - name: short
//!   theme: themes/metro
//!   theme-options: {accent: teal}
//!   output: [html, pdf]
//!   filter:
//!     basics: true
//!     work: [acme-co, initech]
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{CrassError, Result};

use super::document::{kind_of, load_document};
use super::filter::FilterRule;
use super::path::TreePath;
use super::slug::slugify;

/// Output kinds the build pipeline knows how to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    Html,
    Pdf,
}

impl OutputKind {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputKind {
    type Err = CrassError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" | "htm" => Ok(Self::Html),
            "pdf" => Ok(Self::Pdf),
            other => Err(CrassError::ValidationFailed(format!(
                "unsupported output kind '{other}' (expected html|pdf)"
            ))),
        }
    }
}

/// One entry of a vibe's `output` list.
///
/// Entries are either a bare kind (`html`) written to the build directory, or
/// a file path whose extension selects the kind (`out/cv.pdf`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Kind(OutputKind),
    File { kind: OutputKind, path: PathBuf },
    Unsupported(String),
}

impl OutputTarget {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if let Ok(kind) = raw.parse::<OutputKind>() {
            return Self::Kind(kind);
        }
        let path = Path::new(raw);
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) => ext.parse::<OutputKind>().map_or_else(
                |_| Self::Unsupported(raw.to_string()),
                |kind| Self::File {
                    kind,
                    path: path.to_path_buf(),
                },
            ),
            None => Self::Unsupported(raw.to_string()),
        }
    }
}

/// The reserved `overwrite` key. Accepted and carried, never applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Overwrite {
    #[default]
    Absent,
    NotImplemented(Value),
}

/// One named rendering variant.
#[derive(Debug, Clone, PartialEq)]
pub struct Vibe {
    pub name: String,
    pub theme: Option<PathBuf>,
    pub theme_options: Mapping,
    pub outputs: Vec<OutputTarget>,
    pub includes: Option<PathBuf>,
    pub overwrite: Overwrite,
    pub filter: FilterRule,
}

impl Vibe {
    /// File stem used for outputs given as a bare kind.
    #[must_use]
    pub fn file_stem(&self) -> String {
        let slug = slugify(&self.name);
        if slug.is_empty() { "cv".to_string() } else { slug }
    }

    /// Output targets that cannot be produced.
    pub fn unsupported_outputs(&self) -> impl Iterator<Item = &str> {
        self.outputs.iter().filter_map(|target| match target {
            OutputTarget::Unsupported(raw) => Some(raw.as_str()),
            _ => None,
        })
    }

    fn rebase(&mut self, base: &Path) {
        let join = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(theme) = self.theme.as_mut() {
            join(theme);
        }
        if let Some(includes) = self.includes.as_mut() {
            join(includes);
        }
        for target in &mut self.outputs {
            if let OutputTarget::File { path, .. } = target {
                join(path);
            }
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct VibeDoc {
    name: String,
    #[serde(default)]
    theme: Option<PathBuf>,
    #[serde(default)]
    theme_options: Mapping,
    #[serde(default, alias = "outputs")]
    output: Vec<String>,
    #[serde(default)]
    includes: Option<PathBuf>,
    #[serde(default)]
    overwrite: Option<Value>,
    #[serde(default)]
    filter: Option<Value>,
}

impl VibeDoc {
    fn into_vibe(self, path: &TreePath) -> Result<Vibe> {
        if self.name.trim().is_empty() {
            return Err(CrassError::schema(path.key("name"), "vibe name must not be empty"));
        }
        if self.output.is_empty() {
            return Err(CrassError::schema(
                path.key("output"),
                format!("vibe '{}' must request at least one output", self.name),
            ));
        }

        let mut seen = HashSet::new();
        let outputs = self
            .output
            .iter()
            .filter(|raw| seen.insert(raw.trim().to_string()))
            .map(|raw| OutputTarget::parse(raw))
            .collect();

        let filter = match &self.filter {
            None => FilterRule::Include(true),
            Some(value) => FilterRule::from_value(value, &path.key("filter"))?,
        };

        let overwrite = match self.overwrite {
            None | Some(Value::Null) => Overwrite::Absent,
            Some(value) => Overwrite::NotImplemented(value),
        };

        Ok(Vibe {
            name: self.name,
            theme: self.theme,
            theme_options: self.theme_options,
            outputs,
            includes: self.includes,
            overwrite,
            filter,
        })
    }
}

/// An ordered list of vibes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VibesFile {
    vibes: Vec<Vibe>,
}

impl VibesFile {
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Sequence(items) = value else {
            return Err(CrassError::schema(
                TreePath::root(),
                format!("vibes document must be a list of vibes, found {}", kind_of(value)),
            ));
        };

        let vibes = items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let path = TreePath::root().index(idx);
                if !item.is_mapping() {
                    return Err(CrassError::schema(
                        &path,
                        format!("vibe must be a mapping, found {}", kind_of(item)),
                    ));
                }
                let doc: VibeDoc = serde_yaml::from_value(item.clone())
                    .map_err(|err| CrassError::schema(&path, err.to_string()))?;
                doc.into_vibe(&path)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { vibes })
    }

    /// Load a vibes file. Relative theme, include and output paths are taken
    /// relative to the file's directory.
    pub fn load(path: &Path) -> Result<Self> {
        let mut file = Self::from_value(&load_document(path)?)?;
        if let Some(base) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            for vibe in &mut file.vibes {
                vibe.rebase(base);
            }
        }
        debug!(path = %path.display(), count = file.vibes.len(), "loaded vibes");
        Ok(file)
    }

    #[must_use]
    pub fn vibes(&self) -> &[Vibe] {
        &self.vibes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vibes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vibes.is_empty()
    }

    /// First vibe with this name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Vibe> {
        self.vibes.iter().find(|vibe| vibe.name == name)
    }

    /// Names that appear more than once, in first-seen order.
    #[must_use]
    pub fn duplicate_names(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for vibe in &self.vibes {
            if !seen.insert(vibe.name.as_str()) && !duplicates.contains(&vibe.name.as_str()) {
                duplicates.push(vibe.name.as_str());
            }
        }
        duplicates
    }

    /// Select vibes by name, or all of them when `names` is empty.
    pub fn select(&self, names: &[String]) -> Result<Vec<&Vibe>> {
        if names.is_empty() {
            return Ok(self.vibes.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.get(name).ok_or_else(|| {
                    let known = self.vibes.iter().map(|vibe| vibe.name.as_str()).collect::<Vec<_>>();
                    CrassError::NotFound(format!(
                        "no vibe named '{name}' (known: {})",
                        known.join(", ")
                    ))
                })
            })
            .collect()
    }
}
