//! CLI `update` command: change a memory's content or metadata.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};

use cortex::config::CortexConfig;
use cortex::memory::repository::MemoryUpdate;
use cortex::path::MemoryPath;

pub fn update(
    config: &CortexConfig,
    store: Option<&str>,
    path: &str,
    content: Option<String>,
    tags: Option<Vec<String>>,
    expires: Option<DateTime<Utc>>,
    clear_expiry: bool,
) -> Result<()> {
    if content.is_none() && tags.is_none() && expires.is_none() && !clear_expiry {
        bail!("nothing to update: pass --content, --tag, --expires or --clear-expiry");
    }

    let path = MemoryPath::parse(path)?;
    let repo = super::open_repository(config, store)?;
    let memory = repo.update(
        &path,
        MemoryUpdate {
            content,
            tags,
            expires_at: expires,
            clear_expiry,
            citations: None,
        },
    )?;

    println!(
        "Updated {} at {}",
        memory.path,
        memory.metadata.updated_at.to_rfc3339()
    );
    Ok(())
}
