//! Loading CV and vibes documents from YAML or JSON files.

use std::path::Path;

use serde_yaml::Value;
use tracing::debug;

use crate::error::{CrassError, Result};

use super::path::{TreePath, key_label};

/// Source format of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(CrassError::UnsupportedFormat(format!(
                "'{}' doesn't look like yaml or json",
                path.display()
            ))),
        }
    }
}

/// Parse document text into a tree. `source` is only used in error messages.
pub fn parse_document(raw: &str, format: DocumentFormat, source: &str) -> Result<Value> {
    let parsed = match format {
        DocumentFormat::Yaml => serde_yaml::from_str::<Value>(raw).map_err(|err| err.to_string()),
        DocumentFormat::Json => serde_json::from_str::<Value>(raw).map_err(|err| err.to_string()),
    };
    parsed.map_err(|message| CrassError::Parse {
        file: source.to_string(),
        message,
    })
}

/// Read and parse a document from disk.
pub fn load_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)?;
    let raw = std::fs::read_to_string(path).map_err(|err| {
        CrassError::NotFound(format!("read {}: {err}", path.display()))
    })?;
    debug!(path = %path.display(), ?format, bytes = raw.len(), "loaded document");
    parse_document(&raw, format, &path.display().to_string())
}

/// A loaded curriculum vitae: a mapping of section names to arbitrary trees.
#[derive(Debug, Clone, PartialEq)]
pub struct CurriculumVitae {
    root: Value,
}

impl CurriculumVitae {
    /// Wrap a parsed tree, checking that the root is a mapping.
    pub fn from_value(root: Value) -> Result<Self> {
        match root {
            Value::Mapping(_) => Ok(Self { root }),
            Value::Null => Err(CrassError::schema(
                TreePath::root(),
                "CV document is empty",
            )),
            other => Err(CrassError::schema(
                TreePath::root(),
                format!("CV document must be a mapping of sections, found {}", kind_of(&other)),
            )),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        Self::from_value(load_document(path)?)
    }

    pub fn parse(raw: &str, format: DocumentFormat) -> Result<Self> {
        Self::from_value(parse_document(raw, format, "<inline>")?)
    }

    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.root
    }

    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    /// Top-level section names in document order.
    #[must_use]
    pub fn sections(&self) -> Vec<String> {
        self.root
            .as_mapping()
            .map(|map| map.keys().filter_map(key_label).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Value> {
        self.root.get(name)
    }
}

/// Short human name for the kind of a node, for schema messages.
#[must_use]
pub const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
