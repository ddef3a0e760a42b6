//! Core memory type definitions.
//!
//! Defines [`Memory`] (a full record: path, body, metadata) and
//! [`MemoryMetadata`] (the frontmatter stored at the top of each memory file).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::path::MemoryPath;

fn default_source() -> String {
    "user".into()
}

/// Frontmatter of a memory file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryMetadata {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Free-form labels, kept in insertion order.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Who wrote the memory — `"user"`, `"agent"`, `"mcp"`, ...
    #[serde(default = "default_source")]
    pub source: String,
    /// After this instant the memory is hidden from listings and pruned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    /// References (URLs, file paths) backing the memory.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<String>,
}

impl MemoryMetadata {
    /// Fresh metadata stamped with `now` for both timestamps.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            source: default_source(),
            expires_at: None,
            citations: Vec::new(),
        }
    }
}

/// A memory: where it lives, what it says, and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Memory {
    pub path: MemoryPath,
    /// Markdown body (everything after the frontmatter).
    pub content: String,
    pub metadata: MemoryMetadata,
}

impl Memory {
    /// `true` if the memory has an expiry at or before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.metadata.expires_at.is_some_and(|at| at <= now)
    }
}
