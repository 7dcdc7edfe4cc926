//! Theme directories.
//!
//! A theme is a directory with an optional `theme.yaml`:
//!
//! ```yaml
//! options:
//!   title: Curriculum Vitae
//!   lang: en
//! stylesheet: style.css
//! includes: static
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{CrassError, Result};

pub const THEME_FILE: &str = "theme.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ThemeDoc {
    #[serde(default)]
    options: Mapping,
    #[serde(default)]
    stylesheet: Option<String>,
    #[serde(default)]
    includes: Option<PathBuf>,
    /// Template environment and base template; crass renders without templates.
    #[serde(default)]
    env: Option<Value>,
    #[serde(default)]
    base: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    pub root: Option<PathBuf>,
    /// Default option values; a vibe's `theme-options` override them.
    pub options: Mapping,
    pub stylesheet: Option<String>,
    /// Directory copied next to rendered outputs.
    pub includes: Option<PathBuf>,
}

impl Theme {
    /// The theme used when a vibe names none.
    #[must_use]
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn load(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(CrassError::NotFound(format!(
                "theme directory {} does not exist",
                dir.display()
            )));
        }

        let config_path = dir.join(THEME_FILE);
        let doc = if config_path.is_file() {
            let raw = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str::<Option<ThemeDoc>>(&raw)
                .map_err(|err| CrassError::Parse {
                    file: config_path.display().to_string(),
                    message: err.to_string(),
                })?
                .unwrap_or_default()
        } else {
            debug!(theme = %dir.display(), "no {THEME_FILE}; using empty theme options");
            ThemeDoc::default()
        };

        for (key, value) in [("env", &doc.env), ("base", &doc.base)] {
            if value.is_some() {
                debug!(theme = %dir.display(), key, "template setting in {THEME_FILE} ignored");
            }
        }

        Ok(Self {
            root: Some(dir.to_path_buf()),
            options: doc.options,
            stylesheet: doc.stylesheet,
            includes: doc.includes.map(|includes| dir.join(includes)),
        })
    }

    /// Theme defaults with `overrides` applied on top, key by key.
    #[must_use]
    pub fn merged_options(&self, overrides: &Mapping) -> Mapping {
        let mut merged = self.options.clone();
        for (key, value) in overrides {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }
}
