//! Memory file format: YAML frontmatter followed by a Markdown body.
//!
//! ```text
//! ---
//! created_at: 2026-01-05T10:00:00Z
//! updated_at: 2026-01-05T10:00:00Z
//! tags:
//! - architecture
//! source: user
//! ---
//! The index engine keeps one record per category.
//! ```
//!
//! The body is stored verbatim, so a parse of a serialized memory yields the
//! exact content that was written.

use crate::error::{Error, Result};
use crate::memory::types::{Memory, MemoryMetadata};
use crate::path::MemoryPath;

const DELIMITER: &str = "---";

/// Render a memory as file contents.
pub fn serialize_memory(memory: &Memory) -> Result<String> {
    let frontmatter = serde_yaml_ng::to_string(&memory.metadata).map_err(|e| {
        Error::InvalidMemory {
            path: memory.path.to_string(),
            message: e.to_string(),
        }
    })?;
    Ok(format!(
        "{DELIMITER}\n{frontmatter}{DELIMITER}\n{}",
        memory.content
    ))
}

/// Split file contents into metadata and body.
pub fn parse_memory_file(raw: &str) -> std::result::Result<(MemoryMetadata, String), String> {
    let rest = raw
        .strip_prefix("---\n")
        .or_else(|| raw.strip_prefix("---\r\n"))
        .ok_or_else(|| "missing frontmatter".to_string())?;

    let (frontmatter, body) = split_closing_delimiter(rest)
        .ok_or_else(|| "unterminated frontmatter".to_string())?;

    let metadata: MemoryMetadata =
        serde_yaml_ng::from_str(frontmatter).map_err(|e| format!("bad frontmatter: {e}"))?;
    Ok((metadata, body.to_string()))
}

/// Find the first line consisting only of `---` and split around it.
fn split_closing_delimiter(rest: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse a memory file that lives at `path`.
pub fn parse_memory(path: &MemoryPath, raw: &str) -> Result<Memory> {
    let (metadata, content) = parse_memory_file(raw).map_err(|message| Error::InvalidMemory {
        path: path.to_string(),
        message,
    })?;
    Ok(Memory {
        path: path.clone(),
        content,
        metadata,
    })
}
