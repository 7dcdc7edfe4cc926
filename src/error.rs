//! Error types for crass.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CrassError>;

#[derive(Debug, Error)]
pub enum CrassError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("missing config: {0}")]
    MissingConfig(String),

    /// A CV or vibes document does not have the expected shape.
    #[error("schema error at {path}: {message}")]
    Schema { path: String, message: String },

    /// A list element has neither a `slug` nor a field a slug can be derived from.
    #[error("cannot derive slug at {path}: no slug and no usable label field (tried {tried})")]
    SlugDerivation { path: String, tried: String },

    /// A document could not be parsed at all.
    #[error("parse error in {file}: {message}")]
    Parse { file: String, message: String },

    #[error("unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),
}

impl CrassError {
    pub fn schema(path: impl ToString, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.to_string(),
            message: message.into(),
        }
    }

    /// Stable machine-readable code for robot output.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Yaml(_) | Self::Json(_) | Self::Parse { .. } | Self::UnsupportedFormat(_) => {
                "parse"
            }
            Self::Config(_) | Self::MissingConfig(_) => "config",
            Self::Schema { .. } => "schema",
            Self::SlugDerivation { .. } => "slug_derivation",
            Self::Render(_) => "render",
            Self::NotFound(_) => "not_found",
            Self::ValidationFailed(_) => "validation_failed",
        }
    }
}
