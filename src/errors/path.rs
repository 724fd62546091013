//! Field path segments collected while an error unwinds

use std::fmt;

/// Root segment used by outermost calls.
pub const ROOT: &str = "$";

/// One step of a field path.
///
/// Positions inside sequential structures are `Index`, everything else is
/// a `Key`. Only indices are replaced in the wildcarded path form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named key (object key or the root marker)
    Key(String),
    /// Position in a sequence
    Index(usize),
}

impl PathSegment {
    /// The root segment `$`
    pub fn root() -> Self {
        PathSegment::Key(ROOT.to_string())
    }

    /// Builds a segment from an object key.
    ///
    /// Canonical decimal keys ("0", "17", not "007") are positions of an
    /// associative structure that was built from a sequence, so they render
    /// as indices.
    pub fn from_key(key: &str) -> Self {
        match parse_index(key) {
            Some(index) => PathSegment::Index(index),
            None => PathSegment::Key(key.to_string()),
        }
    }

    /// Returns whether this is a sequence position
    pub fn is_index(&self) -> bool {
        matches!(self, PathSegment::Index(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::from_key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Parses a canonical non-negative decimal index.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let bytes = key.as_bytes();
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    if bytes.len() > 1 && bytes[0] == b'0' {
        return None;
    }
    key.parse().ok()
}

/// Joins an innermost-first chain into a dotted path.
pub(crate) fn join_chain(chain: &[PathSegment], placeholder: Option<&str>) -> String {
    chain
        .iter()
        .rev()
        .map(|segment| match (segment, placeholder) {
            (PathSegment::Index(_), Some(placeholder)) => placeholder.to_string(),
            _ => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}
