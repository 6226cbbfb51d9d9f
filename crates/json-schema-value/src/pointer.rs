//! RFC 6901 JSON Pointers.

use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

/// A single step into a JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Object member name
    Key(String),
    /// Array position
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(&escape(key)),
            PathSegment::Index(idx) => write!(f, "{}", idx),
        }
    }
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// An ordered list of path segments.
///
/// Renders as RFC 6901 text: the empty pointer is `""`, and each segment
/// is prefixed with `/` and escaped (`~` as `~0`, `/` as `~1`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    segments: Vec<PathSegment>,
}

impl JsonPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: impl Into<PathSegment>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<PathSegment> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// A copy of this pointer with one more segment.
    pub fn join(&self, segment: impl Into<PathSegment>) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for JsonPointer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromIterator<PathSegment> for JsonPointer {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        JsonPointer {
            segments: iter.into_iter().collect(),
        }
    }
}

/// Escape a reference token: `~` becomes `~0` and `/` becomes `~1`.
pub fn escape(token: &str) -> Cow<'_, str> {
    if token.contains(['~', '/']) {
        Cow::Owned(token.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Reverse of [`escape`]. `~1` is replaced before `~0` so that `~01`
/// decodes to `~1`.
pub fn unescape(token: &str) -> Cow<'_, str> {
    if token.contains('~') {
        Cow::Owned(token.replace("~1", "/").replace("~0", "~"))
    } else {
        Cow::Borrowed(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pointer_renders_empty() {
        assert_eq!(JsonPointer::new().to_string(), "");
    }

    #[test]
    fn test_render_segments() {
        let mut ptr = JsonPointer::new();
        ptr.push("properties");
        ptr.push("a/b");
        ptr.push(3);
        assert_eq!(ptr.to_string(), "/properties/a~1b/3");
        assert_eq!(ptr.len(), 3);
        ptr.pop();
        assert_eq!(ptr.to_string(), "/properties/a~1b");
    }

    #[test]
    fn test_escape_round_trip() {
        assert_eq!(escape("a~b/c"), "a~0b~1c");
        assert_eq!(unescape("a~0b~1c"), "a~b/c");
        assert_eq!(unescape("~01"), "~1");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_join_leaves_original_untouched() {
        let base = JsonPointer::new().join("items");
        let next = base.join(0);
        assert_eq!(base.to_string(), "/items");
        assert_eq!(next.to_string(), "/items/0");
    }

    #[test]
    fn test_serializes_as_string() {
        let ptr = JsonPointer::new().join("a").join(1);
        assert_eq!(serde_json::to_string(&ptr).unwrap(), r#""/a/1""#);
    }
}
