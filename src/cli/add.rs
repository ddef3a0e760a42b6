//! CLI `add` command — create a memory and index it.

use anyhow::Result;
use chrono::{DateTime, Utc};

use cortex::config::CortexConfig;
use cortex::memory::repository::NewMemory;
use cortex::path::MemoryPath;

pub fn add(
    config: &CortexConfig,
    store: Option<&str>,
    path: &str,
    content: Option<String>,
    tags: Vec<String>,
    expires: Option<DateTime<Utc>>,
    citations: Vec<String>,
) -> Result<()> {
    let path = MemoryPath::parse(path)?;
    let content = super::content_or_stdin(content)?;
    let repo = super::open_repository(config, store)?;

    let memory = repo.add(
        &path,
        &content,
        NewMemory {
            tags,
            source: Some("cli".into()),
            expires_at: expires,
            citations,
        },
    )?;

    println!("Added {} ({} bytes)", memory.path, memory.content.len());
    if let Some(at) = memory.metadata.expires_at {
        println!("  Expires: {}", at.to_rfc3339());
    }
    Ok(())
}
