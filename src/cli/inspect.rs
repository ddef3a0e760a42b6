//! CLI `show` command — display full details for a single memory.

use anyhow::Result;

use super::OutputFormat;
use cortex::config::CortexConfig;
use cortex::path::MemoryPath;

/// Show a single memory by path.
pub fn show(
    config: &CortexConfig,
    store: Option<&str>,
    path: &str,
    include_expired: bool,
    format: OutputFormat,
) -> Result<()> {
    let path = MemoryPath::parse(path)?;
    let repo = super::open_repository(config, store)?;
    let m = repo.get(&path, include_expired)?;

    if super::print_structured(&m, format)? {
        return Ok(());
    }

    println!("Memory: {}", m.path);
    println!("{}", "=".repeat(50));
    println!("  Source:         {}", m.metadata.source);
    println!("  Created:        {}", m.metadata.created_at.to_rfc3339());
    println!("  Updated:        {}", m.metadata.updated_at.to_rfc3339());
    if let Some(ref at) = m.metadata.expires_at {
        println!("  Expires:        {}", at.to_rfc3339());
    }
    if !m.metadata.tags.is_empty() {
        println!("  Tags:           {}", m.metadata.tags.join(", "));
    }
    if !m.metadata.citations.is_empty() {
        println!("  Citations:");
        for citation in &m.metadata.citations {
            println!("    - {citation}");
        }
    }
    println!();
    println!("{}", m.content);

    Ok(())
}
