//! Slug resolution for CV list items.
//!
//! Every mapping that sits inside a list gets a `slug`: an explicit one is
//! kept as written, otherwise one is derived from the first usable label
//! field (see [`SlugRules`]). Slugs are unique among siblings; derived slugs
//! that collide get `-2`, `-3`, ... appended in list order.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::{CrassError, Result};

use super::document::{CurriculumVitae, kind_of};
use super::path::{TreePath, key_label};

/// Key holding an item's slug.
pub const SLUG_KEY: &str = "slug";

/// Label fields tried, in order, when a section has no entry of its own.
pub const DEFAULT_LABEL_FIELDS: &[&str] = &[
    "name",
    "network",
    "organization",
    "institution",
    "title",
    "language",
];

/// Which field of a list item supplies the text a slug is derived from.
///
/// Lookups go by section: the mapping key that holds the list (`work`,
/// `courses`, ...). Sections without an entry use the default order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugRules {
    default_fields: Vec<String>,
    sections: BTreeMap<String, Vec<String>>,
}

impl Default for SlugRules {
    fn default() -> Self {
        Self {
            default_fields: DEFAULT_LABEL_FIELDS.iter().map(ToString::to_string).collect(),
            sections: BTreeMap::new(),
        }
    }
}

impl SlugRules {
    #[must_use]
    pub const fn new(default_fields: Vec<String>, sections: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            default_fields,
            sections,
        }
    }

    /// Use `fields` for lists held under `section`.
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>, fields: Vec<String>) -> Self {
        self.sections.insert(section.into(), fields);
        self
    }

    #[must_use]
    pub fn fields_for(&self, section: Option<&str>) -> &[String] {
        section
            .and_then(|name| self.sections.get(name))
            .unwrap_or(&self.default_fields)
    }
}

/// Normalize free text into a lowercase, hyphen-separated ASCII token.
///
/// Diacritics are stripped by compatibility decomposition; any other run of
/// non-alphanumeric characters becomes a single hyphen.
#[must_use]
pub fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.nfkd().filter(|ch| !is_combining_mark(*ch)) {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    out
}

/// Return a copy of `cv` in which every list item carries a unique `slug`.
pub fn resolve_slugs(cv: &CurriculumVitae, rules: &SlugRules) -> Result<CurriculumVitae> {
    let resolved = resolve_value(cv.as_value(), &TreePath::root(), rules)?;
    CurriculumVitae::from_value(resolved)
}

fn resolve_value(value: &Value, path: &TreePath, rules: &SlugRules) -> Result<Value> {
    match value {
        Value::Mapping(map) => resolve_mapping(map, path, rules).map(Value::Mapping),
        Value::Sequence(items) => resolve_sequence(items, path, rules).map(Value::Sequence),
        other => Ok(other.clone()),
    }
}

fn resolve_mapping(map: &Mapping, path: &TreePath, rules: &SlugRules) -> Result<Mapping> {
    let mut out = Mapping::with_capacity(map.len());
    for (key, child) in map {
        let child_path = key_label(key).map_or_else(|| path.clone(), |label| path.key(label));
        out.insert(key.clone(), resolve_value(child, &child_path, rules)?);
    }
    Ok(out)
}

fn resolve_sequence(items: &[Value], path: &TreePath, rules: &SlugRules) -> Result<Vec<Value>> {
    let fields = rules.fields_for(path.last_key());

    // Explicit slugs are claimed before any derivation so derived ones never shadow them.
    let mut taken = HashSet::new();
    for (idx, item) in items.iter().enumerate() {
        let Value::Mapping(map) = item else { continue };
        if let Some(slug) = explicit_slug(map, &path.index(idx))? {
            if !taken.insert(slug.clone()) {
                warn!(path = %path.index(idx), slug = %slug, "duplicate explicit slug among siblings");
            }
        }
    }

    let mut out = Vec::with_capacity(items.len());
    for (idx, item) in items.iter().enumerate() {
        let item_path = path.index(idx);
        let Value::Mapping(map) = item else {
            out.push(resolve_value(item, &item_path, rules)?);
            continue;
        };

        let mut resolved = resolve_mapping(map, &item_path, rules)?;
        let slug = match explicit_slug(map, &item_path)? {
            Some(slug) => slug,
            None => {
                let base = derive_slug(map, fields).ok_or_else(|| CrassError::SlugDerivation {
                    path: item_path.to_string(),
                    tried: fields.join(", "),
                })?;
                let slug = claim_unique(base, &mut taken);
                debug!(path = %item_path, slug = %slug, "derived slug");
                slug
            }
        };
        // Stored as a string so filters can match numeric or boolean slugs too.
        resolved.insert(Value::from(SLUG_KEY), Value::from(slug));
        out.push(Value::Mapping(resolved));
    }
    Ok(out)
}

/// The item's own slug, if it has a non-empty scalar one.
fn explicit_slug(map: &Mapping, path: &TreePath) -> Result<Option<String>> {
    match map.get(SLUG_KEY) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(Value::Bool(flag)) => Ok(Some(flag.to_string())),
        Some(other) => Err(CrassError::schema(
            path.key(SLUG_KEY),
            format!("slug must be a string, found {}", kind_of(other)),
        )),
    }
}

fn derive_slug(map: &Mapping, fields: &[String]) -> Option<String> {
    fields.iter().find_map(|field| {
        let label = match map.get(field.as_str())? {
            Value::String(text) => text.clone(),
            Value::Number(number) => number.to_string(),
            _ => return None,
        };
        let slug = slugify(&label);
        (!slug.is_empty()).then_some(slug)
    })
}

/// `base`, or the first of `base-2`, `base-3`, ... not yet in `taken`. Claims the result.
pub(crate) fn claim_unique(base: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(base.clone()) {
        return base;
    }
    let mut suffix = 2usize;
    loop {
        let candidate = format!("{base}-{suffix}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        suffix += 1;
    }
}

/// A slug found in a resolved tree, with the path of the item that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlugEntry {
    pub path: String,
    pub slug: String,
}

/// List every list-item slug in `cv`, in document order.
#[must_use]
pub fn collect_slugs(cv: &CurriculumVitae) -> Vec<SlugEntry> {
    let mut entries = Vec::new();
    collect_into(cv.as_value(), &TreePath::root(), false, &mut entries);
    entries
}

fn collect_into(value: &Value, path: &TreePath, in_list: bool, out: &mut Vec<SlugEntry>) {
    match value {
        Value::Mapping(map) => {
            if in_list {
                if let Some(slug) = map.get(SLUG_KEY).and_then(Value::as_str) {
                    out.push(SlugEntry {
                        path: path.to_string(),
                        slug: slug.to_string(),
                    });
                }
            }
            for (key, child) in map {
                if let Some(label) = key_label(key) {
                    collect_into(child, &path.key(label), false, out);
                }
            }
        }
        Value::Sequence(items) => {
            for (idx, item) in items.iter().enumerate() {
                collect_into(item, &path.index(idx), true, out);
            }
        }
        _ => {}
    }
}
