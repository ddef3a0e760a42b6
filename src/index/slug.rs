//! Normalization of on-disk names into slugs.
//!
//! The reindexer meets names it did not create (`Meeting Notes`, `TODO_list`,
//! `---`). [`normalize_slug`] maps one name to a slug; [`assign_slugs`] does
//! it for a whole sibling set, skipping names that normalize to nothing and
//! suffixing collisions (`foo`, `foo-2`, `foo-3`) in lexicographic order of
//! the original names, so repeated scans of an unchanged tree agree.

use std::collections::HashSet;
use std::fmt;

/// Map an arbitrary name to a slug. Returns an empty string if nothing survives.
pub fn normalize_slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut in_separator_run = false;

    for c in lowered.chars() {
        if c == ' ' || c == '_' {
            if !in_separator_run {
                out.push('-');
                in_separator_run = true;
            }
            continue;
        }
        in_separator_run = false;
        if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            out.push(c);
        }
    }

    out.trim_matches('-').to_string()
}

/// An anomaly resolved while assigning slugs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugWarning {
    /// The name normalized to an empty slug and was left out.
    Skipped { original: String },
    /// The name collided with an earlier sibling and got a numeric suffix.
    Renamed { original: String, slug: String },
}

impl SlugWarning {
    /// Prefix the original name with the directory it was found in.
    pub fn qualified(self, dir: &str) -> Self {
        let qualify = |original: String| {
            if dir.is_empty() {
                original
            } else {
                format!("{dir}/{original}")
            }
        };
        match self {
            Self::Skipped { original } => Self::Skipped {
                original: qualify(original),
            },
            Self::Renamed { original, slug } => Self::Renamed {
                original: qualify(original),
                slug,
            },
        }
    }
}

impl fmt::Display for SlugWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped { original } => {
                write!(f, "skipped: {original} normalizes to empty path")
            }
            Self::Renamed { original, slug } => {
                write!(f, "renamed: {original} -> {slug} (collision)")
            }
        }
    }
}

/// The slug given to one original name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlugAssignment {
    pub original: String,
    pub slug: String,
}

/// Result of normalizing one sibling set.
#[derive(Debug, Clone, Default)]
pub struct SiblingSlugs {
    /// Assignments in lexicographic order of the original names.
    pub assigned: Vec<SlugAssignment>,
    pub warnings: Vec<SlugWarning>,
}

/// Normalize every name in one sibling set and resolve collisions.
///
/// Input order does not matter: names are sorted before assignment.
pub fn assign_slugs<I, S>(names: I) -> SiblingSlugs
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut originals: Vec<String> = names.into_iter().map(Into::into).collect();
    originals.sort();
    originals.dedup();

    let mut used: HashSet<String> = HashSet::new();
    let mut result = SiblingSlugs::default();

    for original in originals {
        let base = normalize_slug(&original);
        if base.is_empty() {
            result.warnings.push(SlugWarning::Skipped { original });
            continue;
        }

        let slug = if used.contains(&base) {
            let slug = (2..)
                .map(|n| format!("{base}-{n}"))
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_default();
            result.warnings.push(SlugWarning::Renamed {
                original: original.clone(),
                slug: slug.clone(),
            });
            slug
        } else {
            base
        };

        used.insert(slug.clone());
        result.assigned.push(SlugAssignment { original, slug });
    }

    result
}
