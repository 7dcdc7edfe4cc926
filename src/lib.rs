//! crass - build filtered variants ("vibes") of a curriculum vitae.
//!
//! A CV is one YAML/JSON document. A vibes file lists named variants, each
//! with a filter selecting which sections and list items to keep, a theme and
//! the outputs to produce. List items are addressed by slug; see
//! [`crate::core::slug`] and [`crate::core::filter`].

pub mod app;
pub mod build;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod render;
pub mod test_utils;
pub mod utils;

pub use error::{CrassError, Result};
