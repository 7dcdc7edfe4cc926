use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::slug::{DEFAULT_LABEL_FIELDS, SlugRules};
use crate::error::{CrassError, Result};

pub const PROJECT_CONFIG_FILE: &str = "crass.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub slugs: SlugsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub pdf: PdfConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, project_root: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("CRASS_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            match Self::load_patch(&path)? {
                Some(patch) => config.merge_patch(patch),
                None => {
                    return Err(CrassError::MissingConfig(format!(
                        "config file {} does not exist",
                        path.display()
                    )));
                }
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(root) = project_root {
                if let Some(project) = Self::load_patch(&root.join(PROJECT_CONFIG_FILE))? {
                    config.merge_patch(project);
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("crass/config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| CrassError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| CrassError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.slugs {
            self.slugs.merge(patch);
        }
        if let Some(patch) = patch.build {
            self.build.merge(patch);
        }
        if let Some(patch) = patch.pdf {
            self.pdf.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(values) = env_list("CRASS_LABEL_FIELDS") {
            self.slugs.label_fields = values;
        }

        if let Some(value) = env_string("CRASS_OUT_DIR") {
            self.build.out_dir = PathBuf::from(value);
        }
        if let Some(value) = env_string("CRASS_THEME") {
            self.build.theme = Some(PathBuf::from(value));
        }

        if let Some(value) = env_string("CRASS_PDF_COMMAND") {
            self.pdf.command = value;
        }
        if let Some(value) = env_string("CRASS_PDF_PAGE_SIZE") {
            self.pdf.page_size = value;
        }
    }

    #[must_use]
    pub fn slug_rules(&self) -> SlugRules {
        SlugRules::new(self.slugs.label_fields.clone(), self.slugs.sections.clone())
    }
}

/// Which fields slugs are derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlugsConfig {
    /// Default label field order.
    #[serde(default)]
    pub label_fields: Vec<String>,
    /// Per-section label field order, keyed by the list's section name.
    #[serde(default)]
    pub sections: BTreeMap<String, Vec<String>>,
}

impl Default for SlugsConfig {
    fn default() -> Self {
        Self {
            label_fields: DEFAULT_LABEL_FIELDS.iter().map(ToString::to_string).collect(),
            sections: BTreeMap::new(),
        }
    }
}

impl SlugsConfig {
    fn merge(&mut self, patch: SlugsPatch) {
        if let Some(values) = patch.label_fields {
            self.label_fields = values;
        }
        if let Some(sections) = patch.sections {
            self.sections.extend(sections);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub out_dir: PathBuf,
    /// Theme used by vibes that do not name one.
    #[serde(default)]
    pub theme: Option<PathBuf>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("build"),
            theme: None,
        }
    }
}

impl BuildConfig {
    fn merge(&mut self, patch: BuildPatch) {
        if let Some(value) = patch.out_dir {
            self.out_dir = value;
        }
        if let Some(value) = patch.theme {
            self.theme = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfConfig {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub page_size: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            command: "wkhtmltopdf".to_string(),
            page_size: "A4".to_string(),
            extra_args: Vec::new(),
        }
    }
}

impl PdfConfig {
    fn merge(&mut self, patch: PdfPatch) {
        if let Some(value) = patch.command {
            self.command = value;
        }
        if let Some(value) = patch.page_size {
            self.page_size = value;
        }
        if let Some(values) = patch.extra_args {
            self.extra_args = values;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub slugs: Option<SlugsPatch>,
    pub build: Option<BuildPatch>,
    pub pdf: Option<PdfPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SlugsPatch {
    pub label_fields: Option<Vec<String>>,
    pub sections: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct BuildPatch {
    pub out_dir: Option<PathBuf>,
    pub theme: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PdfPatch {
    pub command: Option<String>,
    pub page_size: Option<String>,
    pub extra_args: Option<Vec<String>>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_list(key: &str) -> Option<Vec<String>> {
    std::env::var(key).ok().map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(ToString::to_string)
            .collect()
    })
}
