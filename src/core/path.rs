//! Locations inside a CV or vibes tree, used in error and warning messages.

use std::fmt;

use serde_yaml::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Path from the document root to a node, rendered as `work[2].highlights`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreePath {
    segments: Vec<Segment>,
}

impl TreePath {
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[must_use]
    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Key(key.into()));
        next
    }

    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(Segment::Index(index));
        next
    }

    /// The nearest mapping key on the path, ignoring list indices.
    ///
    /// For `education[0].courses` this is `courses`; for `work` it is `work`.
    #[must_use]
    pub fn last_key(&self) -> Option<&str> {
        self.segments.iter().rev().find_map(|segment| match segment {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Index(_) => None,
        })
    }
}

impl fmt::Display for TreePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) if idx == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// Text form of a mapping key, if it is a scalar that can name a CV field.
#[must_use]
pub fn key_label(key: &Value) -> Option<String> {
    match key {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
