//! The filter engine: reduce a resolved CV to what one vibe asks for.
//!
//! A filter is a tree of rules parallel to the CV. Each key maps to `true`
//! (keep the subtree), `false` (drop it), a list of slugs (keep only those
//! list items) or a nested filter (recurse). Keys a filter does not mention
//! are dropped.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use serde_yaml::{Mapping, Value};
use tracing::{debug, warn};

use crate::error::{CrassError, Result};

use super::document::kind_of;
use super::path::{TreePath, key_label};
use super::slug::SLUG_KEY;

/// One rule in a filter tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterRule {
    /// `true` keeps the subtree unchanged, `false` removes it.
    Include(bool),
    /// Keep only the list items whose slug is listed.
    Slugs(Vec<String>),
    /// Apply a nested filter to a mapping, or to every mapping in a list.
    Nested(FilterSpec),
}

/// Ordered mapping of CV keys to rules at one level of the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSpec {
    rules: Vec<(String, FilterRule)>,
}

impl FilterSpec {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Add or replace the rule for `key`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, rule: FilterRule) -> Self {
        self.insert(key, rule);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, rule: FilterRule) {
        let key = key.into();
        if let Some(slot) = self.rules.iter_mut().find(|(name, _)| *name == key) {
            slot.1 = rule;
        } else {
            self.rules.push((key, rule));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FilterRule> {
        self.rules
            .iter()
            .find_map(|(name, rule)| (name == key).then_some(rule))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterRule)> {
        self.rules.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FilterRule {
    /// Parse a rule from its document form. `path` locates it for errors.
    pub fn from_value(value: &Value, path: &TreePath) -> Result<Self> {
        match value {
            Value::Bool(flag) => Ok(Self::Include(*flag)),
            Value::Sequence(items) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| match item {
                    Value::String(text) => Ok(text.clone()),
                    Value::Number(number) => Ok(number.to_string()),
                    other => Err(CrassError::schema(
                        path.index(idx),
                        format!("slug filter entries must be strings, found {}", kind_of(other)),
                    )),
                })
                .collect::<Result<Vec<_>>>()
                .map(Self::Slugs),
            Value::Mapping(map) => {
                let mut spec = FilterSpec::new();
                for (key, child) in map {
                    let name = key_label(key).ok_or_else(|| {
                        CrassError::schema(path, format!("filter keys must be strings, found {}", kind_of(key)))
                    })?;
                    let rule = Self::from_value(child, &path.key(name.clone()))?;
                    spec.insert(name, rule);
                }
                Ok(Self::Nested(spec))
            }
            other => Err(CrassError::schema(
                path,
                format!(
                    "filter value must be a boolean, a list of slugs or a mapping, found {}",
                    kind_of(other)
                ),
            )),
        }
    }
}

/// A filter referenced a slug that no sibling item has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownSlug {
    pub path: String,
    pub slug: String,
    pub available: Vec<String>,
}

impl fmt::Display for UnknownSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: could not find anything called '{}', options are '{}'",
            self.path,
            self.slug,
            self.available.join(", ")
        )
    }
}

/// Result of one filter pass: the reduced tree plus non-fatal warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOutcome {
    pub value: Value,
    pub warnings: Vec<UnknownSlug>,
}

/// Filter a resolved CV tree. The input is never modified; retained subtrees are copied.
///
/// A top-level `false` yields an empty mapping.
pub fn apply_filter(cv: &Value, rule: &FilterRule) -> Result<FilterOutcome> {
    let mut warnings = Vec::new();
    let value = filter_value(cv, rule, &TreePath::root(), &mut warnings)?
        .unwrap_or_else(|| Value::Mapping(Mapping::new()));
    Ok(FilterOutcome { value, warnings })
}

fn filter_value(
    value: &Value,
    rule: &FilterRule,
    path: &TreePath,
    warnings: &mut Vec<UnknownSlug>,
) -> Result<Option<Value>> {
    match rule {
        FilterRule::Include(true) => Ok(Some(value.clone())),
        FilterRule::Include(false) => Ok(None),
        FilterRule::Slugs(slugs) => select_slugs(value, slugs, path, warnings).map(Some),
        FilterRule::Nested(spec) => filter_nested(value, spec, path, warnings).map(Some),
    }
}

fn filter_nested(
    value: &Value,
    spec: &FilterSpec,
    path: &TreePath,
    warnings: &mut Vec<UnknownSlug>,
) -> Result<Value> {
    match value {
        Value::Mapping(map) => filter_mapping(map, spec, path, warnings).map(Value::Mapping),
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(idx, item)| {
                let item_path = path.index(idx);
                match item {
                    Value::Mapping(map) => {
                        filter_mapping(map, spec, &item_path, warnings).map(Value::Mapping)
                    }
                    other => Err(CrassError::schema(
                        item_path,
                        format!("nested filter expects mapping items, found {}", kind_of(other)),
                    )),
                }
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Sequence),
        other => Err(CrassError::schema(
            path,
            format!("nested filter expects a mapping or a list of mappings, found {}", kind_of(other)),
        )),
    }
}

fn filter_mapping(
    map: &Mapping,
    spec: &FilterSpec,
    path: &TreePath,
    warnings: &mut Vec<UnknownSlug>,
) -> Result<Mapping> {
    for (name, _) in spec.iter() {
        if !map.contains_key(name) {
            debug!(path = %path, key = name, "filter key not present in cv; skipping");
        }
    }

    // Output follows the CV's key order; unmentioned keys are dropped.
    let mut out = Mapping::new();
    for (key, child) in map {
        let Some(name) = key_label(key) else { continue };
        let Some(rule) = spec.get(&name) else { continue };
        if let Some(filtered) = filter_value(child, rule, &path.key(name.clone()), warnings)? {
            out.insert(key.clone(), filtered);
        }
    }
    Ok(out)
}

fn select_slugs(
    value: &Value,
    slugs: &[String],
    path: &TreePath,
    warnings: &mut Vec<UnknownSlug>,
) -> Result<Value> {
    let Value::Sequence(items) = value else {
        return Err(CrassError::schema(
            path,
            format!("slug list filter expects a list of items, found {}", kind_of(value)),
        ));
    };

    let wanted: HashSet<&str> = slugs.iter().map(String::as_str).collect();
    let available: Vec<String> = items
        .iter()
        .filter_map(|item| item.get(SLUG_KEY).and_then(Value::as_str))
        .map(ToString::to_string)
        .collect();

    let mut reported = HashSet::new();
    for slug in slugs {
        if !available.iter().any(|candidate| candidate == slug) && reported.insert(slug.as_str()) {
            let warning = UnknownSlug {
                path: path.to_string(),
                slug: slug.clone(),
                available: available.clone(),
            };
            warn!(path = %path, slug = %slug, "{warning}");
            warnings.push(warning);
        }
    }

    let kept = items
        .iter()
        .filter(|item| {
            item.get(SLUG_KEY)
                .and_then(Value::as_str)
                .is_some_and(|slug| wanted.contains(slug))
        })
        .cloned()
        .collect();
    Ok(Value::Sequence(kept))
}
