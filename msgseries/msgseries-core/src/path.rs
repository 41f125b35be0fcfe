//! Hierarchical series names.

use std::fmt::{Display, Formatter, Result};

/// Slash-joined sequence of non-empty name segments identifying one series.
///
/// A root path built from a topic name may be empty; every path derived from
/// it through [`FieldPath::child`] carries at least one segment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    rendered: String,
}

impl FieldPath {
    /// Root prefix for a message source. Leading, trailing and repeated `/`
    /// are dropped, so `/robot/imu/` becomes `robot/imu`.
    pub fn root(topic: &str) -> Self {
        Self {
            rendered: normalize(topic),
        }
    }

    /// Append one segment.
    ///
    /// Slashes inside `segment` split it into several segments. A segment
    /// that is empty after normalization is written as `_`.
    pub fn child(&self, segment: &str) -> Self {
        let mut segment = normalize(segment);
        if segment.is_empty() {
            segment.push('_');
        }
        if self.rendered.is_empty() {
            return Self { rendered: segment };
        }
        Self {
            rendered: format!("{}/{}", self.rendered, segment),
        }
    }

    /// Append an array index segment.
    pub fn index(&self, i: usize) -> Self {
        self.child(&i.to_string())
    }

    /// Append a name taken from message data, falling back to the element
    /// index when the name is blank.
    pub fn named_element(&self, name: &str, i: usize) -> Self {
        if name.trim_matches('/').is_empty() {
            self.index(i)
        } else {
            self.child(name)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.rendered
    }

    pub fn is_root(&self) -> bool {
        self.rendered.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.rendered.split('/').filter(|s| !s.is_empty())
    }
}

fn normalize(raw: &str) -> String {
    raw.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

impl Display for FieldPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
