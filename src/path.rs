//! Category and memory path values.
//!
//! A [`CategoryPath`] is a sequence of slug segments (`project/cortex`); the
//! empty sequence is the root category. A [`MemoryPath`] is a category plus one
//! trailing slug naming the memory. Both compare structurally, so `a//b/` and
//! `a/b` parse to the same value.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Returns `true` if `segment` is already a canonical slug: a non-empty run of
/// `[a-z0-9-]` that neither starts nor ends with `-`.
///
/// These are exactly the names [`normalize_slug`](crate::index::slug::normalize_slug)
/// leaves unchanged, so a path written through the API is indexed under the
/// same name by a full reindex.
pub fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && !segment.starts_with('-')
        && !segment.ends_with('-')
        && segment
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

fn split_segments(raw: &str) -> Result<Vec<String>> {
    if raw.contains('\\') {
        return Err(Error::invalid_path(raw, "only '/' may be used as a separator"));
    }
    raw.split('/')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            if is_valid_segment(segment) {
                Ok(segment.to_string())
            } else {
                Err(Error::invalid_path(
                    raw,
                    format!("segment '{segment}' must be a lowercase slug [a-z0-9-] without leading or trailing hyphens"),
                ))
            }
        })
        .collect()
}

/// A validated category path. The empty path is the root category.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryPath {
    segments: Vec<String>,
}

impl CategoryPath {
    /// The root category.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `/`-separated path. Empty input yields the root.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            segments: split_segments(raw)?,
        })
    }

    /// Build from already-split segments, validating each one.
    pub fn from_segments<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for segment in &segments {
            if !is_valid_segment(segment) {
                return Err(Error::invalid_path(
                    segments.join("/"),
                    format!("segment '{segment}' must be a lowercase slug [a-z0-9-] without leading or trailing hyphens"),
                ));
            }
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Last segment, or `None` for the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Immediate parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Child category one segment below this one.
    pub fn child(&self, segment: &str) -> Result<Self> {
        if !is_valid_segment(segment) {
            return Err(Error::invalid_path(
                format!("{self}/{segment}"),
                format!("segment '{segment}' must be a lowercase slug [a-z0-9-] without leading or trailing hyphens"),
            ));
        }
        let mut segments = self.segments.clone();
        segments.push(segment.to_string());
        Ok(Self { segments })
    }

    /// Strict ancestors ordered from the immediate parent up to the root.
    pub fn ancestors(&self) -> Vec<Self> {
        (0..self.segments.len())
            .rev()
            .map(|len| Self {
                segments: self.segments[..len].to_vec(),
            })
            .collect()
    }

    /// Returns `true` if `other` sits exactly one segment below `self`.
    pub fn is_parent_of(&self, other: &CategoryPath) -> bool {
        other.segments.len() == self.segments.len() + 1
            && other.segments.starts_with(&self.segments)
    }

    /// Returns `true` if `other` is `self` or lies anywhere beneath it.
    pub fn contains(&self, other: &CategoryPath) -> bool {
        other.segments.starts_with(&self.segments)
    }
}

impl fmt::Display for CategoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for CategoryPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CategoryPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<CategoryPath> for String {
    fn from(path: CategoryPath) -> Self {
        path.to_string()
    }
}

/// A validated memory path: a category plus the memory's own slug.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemoryPath {
    category: CategoryPath,
    slug: String,
}

impl MemoryPath {
    pub fn new(category: CategoryPath, slug: &str) -> Result<Self> {
        if !is_valid_segment(slug) {
            return Err(Error::invalid_path(
                format!("{category}/{slug}"),
                format!("memory slug '{slug}' must be a lowercase slug [a-z0-9-] without leading or trailing hyphens"),
            ));
        }
        Ok(Self {
            category,
            slug: slug.to_string(),
        })
    }

    /// Parse `category/.../slug`. The last segment is the memory slug.
    pub fn parse(raw: &str) -> Result<Self> {
        let mut segments = split_segments(raw)?;
        let slug = segments
            .pop()
            .ok_or_else(|| Error::invalid_path(raw, "memory path must not be empty"))?;
        Ok(Self {
            category: CategoryPath { segments },
            slug,
        })
    }

    pub fn category(&self) -> &CategoryPath {
        &self.category
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl fmt::Display for MemoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_root() {
            f.write_str(&self.slug)
        } else {
            write!(f, "{}/{}", self.category, self.slug)
        }
    }
}

impl FromStr for MemoryPath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MemoryPath {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<MemoryPath> for String {
    fn from(path: MemoryPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_root() {
        let root = CategoryPath::parse("").unwrap();
        assert!(root.is_root());
        assert_eq!(root, CategoryPath::root());
        assert_eq!(root.to_string(), "");
        assert_eq!(CategoryPath::parse("/").unwrap(), root);
    }

    #[test]
    fn separators_collapse_structurally() {
        let a = CategoryPath::parse("project/cortex").unwrap();
        assert_eq!(CategoryPath::parse("project//cortex/").unwrap(), a);
        assert_eq!(CategoryPath::parse("/project/cortex").unwrap(), a);
        assert_eq!(a.to_string(), "project/cortex");
    }

    #[test]
    fn rejects_invalid_characters() {
        for raw in ["Project", "a b", "a/b.c", "a\\b", "..", "über", "snake_case", "-lead", "trail-/x"] {
            let err = CategoryPath::parse(raw).unwrap_err();
            assert_eq!(err.code(), "INVALID_PATH", "input {raw:?}");
        }
        assert!(CategoryPath::parse("kebab-case/v2/a--b").is_ok());
        assert!(MemoryPath::parse("notes/x_y").is_err());
    }

    #[test]
    fn valid_segments_are_fixed_points_of_normalization() {
        use crate::index::slug::normalize_slug;
        for seg in ["a", "kebab-case", "a--b", "v2", "snake_case", "-lead", "tail-", "A", "a b", "---"] {
            assert_eq!(
                is_valid_segment(seg),
                normalize_slug(seg) == seg,
                "segment {seg:?}"
            );
        }
    }

    #[test]
    fn parent_and_ancestors() {
        let path = CategoryPath::parse("a/b/c").unwrap();
        assert_eq!(path.parent().unwrap().to_string(), "a/b");
        let chain: Vec<String> = path.ancestors().iter().map(ToString::to_string).collect();
        assert_eq!(chain, vec!["a/b", "a", ""]);
        assert!(CategoryPath::root().parent().is_none());
        assert!(CategoryPath::root().ancestors().is_empty());
    }

    #[test]
    fn parent_of_is_exactly_one_level() {
        let a = CategoryPath::parse("a").unwrap();
        let ab = CategoryPath::parse("a/b").unwrap();
        let abc = CategoryPath::parse("a/b/c").unwrap();
        assert!(a.is_parent_of(&ab));
        assert!(!a.is_parent_of(&abc));
        assert!(CategoryPath::root().is_parent_of(&a));
        assert!(a.contains(&abc));
        assert!(!ab.contains(&a));
    }

    #[test]
    fn memory_path_splits_category_and_slug() {
        let path = MemoryPath::parse("project/cortex/arch").unwrap();
        assert_eq!(path.category().to_string(), "project/cortex");
        assert_eq!(path.slug(), "arch");
        assert_eq!(path.to_string(), "project/cortex/arch");

        let top = MemoryPath::parse("note").unwrap();
        assert!(top.category().is_root());
        assert_eq!(top.to_string(), "note");

        assert_eq!(MemoryPath::parse("//").unwrap_err().code(), "INVALID_PATH");
    }

    #[test]
    fn serde_uses_string_form() {
        let path = MemoryPath::parse("a/b/note").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"a/b/note\"");
        let back: MemoryPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
        assert!(serde_json::from_str::<CategoryPath>("\"Bad Path\"").is_err());
    }
}
