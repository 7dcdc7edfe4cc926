//! Core CV types and logic: loading, slug resolution, filtering and vibes.

pub mod document;
pub mod filter;
pub mod path;
pub mod slug;
pub mod vibe;

pub use document::{CurriculumVitae, DocumentFormat, load_document, parse_document};
pub use filter::{FilterOutcome, FilterRule, FilterSpec, UnknownSlug, apply_filter};
pub use path::TreePath;
pub use slug::{SlugEntry, SlugRules, collect_slugs, resolve_slugs, slugify};
pub use vibe::{OutputKind, OutputTarget, Overwrite, Vibe, VibesFile};
