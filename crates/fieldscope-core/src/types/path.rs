//! Dotted field paths
//!
//! A field path names a (possibly nested) field of a record, e.g.
//! `status.name` or `fields.assignee.displayName`. Array indexing
//! (`components[0].name`, `labels[]`, `items[*]`) is not supported: such a
//! path is rejected as a whole rather than resolved partially.

use std::fmt;

use thiserror::Error;

const SEPARATOR: char = '.';

/// Why a path cannot be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnsupportedPath {
    #[error("bracket notation is not supported")]
    BracketNotation,

    #[error("empty field path")]
    Empty,
}

/// A parsed, supported field path
///
/// Borrows its segments from the raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath<'a> {
    raw: &'a str,
    segments: Vec<&'a str>,
}

impl<'a> FieldPath<'a> {
    /// Parse a dotted path
    ///
    /// Any `[` or `]` anywhere in the string makes the whole path unsupported.
    /// Segments are otherwise taken literally.
    pub fn parse(raw: &'a str) -> Result<Self, UnsupportedPath> {
        if raw.is_empty() {
            return Err(UnsupportedPath::Empty);
        }
        if raw.contains(['[', ']']) {
            return Err(UnsupportedPath::BracketNotation);
        }

        Ok(Self {
            raw,
            segments: raw.split(SEPARATOR).collect(),
        })
    }

    /// Check whether a path would parse
    pub fn is_supported(raw: &str) -> bool {
        FieldPath::parse(raw).is_ok()
    }

    /// The original path string
    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// First segment (the top-level field name)
    pub fn root(&self) -> &'a str {
        self.segments[0]
    }

    /// Everything after the root, including the leading separator
    pub fn suffix(&self) -> &'a str {
        &self.raw[self.root().len()..]
    }

    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }
}

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let path = FieldPath::parse("summary").unwrap();
        assert_eq!(path.segments(), &["summary"]);
        assert_eq!(path.root(), "summary");
        assert_eq!(path.suffix(), "");
        assert!(!path.is_nested());
    }

    #[test]
    fn test_parse_nested() {
        let path = FieldPath::parse("fields.assignee.displayName").unwrap();
        assert_eq!(path.segments(), &["fields", "assignee", "displayName"]);
        assert_eq!(path.root(), "fields");
        assert_eq!(path.suffix(), ".assignee.displayName");
        assert!(path.is_nested());
        assert_eq!(path.to_string(), "fields.assignee.displayName");
    }

    #[test]
    fn test_bracket_notation_is_unsupported() {
        for raw in ["components[0].name", "labels[]", "items[*]", "a.b[", "x]"] {
            assert_eq!(
                FieldPath::parse(raw),
                Err(UnsupportedPath::BracketNotation),
                "{raw} should be unsupported"
            );
            assert!(!FieldPath::is_supported(raw));
        }
    }

    #[test]
    fn test_empty_is_unsupported() {
        assert_eq!(FieldPath::parse(""), Err(UnsupportedPath::Empty));
    }

    #[test]
    fn test_segments_are_literal() {
        let path = FieldPath::parse("a..b").unwrap();
        assert_eq!(path.segments(), &["a", "", "b"]);
    }
}
