//! CLI `remove` and `move` commands.

use anyhow::Result;

use cortex::config::CortexConfig;
use cortex::path::MemoryPath;

pub fn remove(config: &CortexConfig, store: Option<&str>, path: &str) -> Result<()> {
    let path = MemoryPath::parse(path)?;
    let repo = super::open_repository(config, store)?;
    repo.remove(&path)?;
    println!("Removed {path}");
    Ok(())
}

pub fn move_memory(config: &CortexConfig, store: Option<&str>, from: &str, to: &str) -> Result<()> {
    let from = MemoryPath::parse(from)?;
    let to = MemoryPath::parse(to)?;
    let repo = super::open_repository(config, store)?;
    let memory = repo.move_memory(&from, &to)?;
    println!("Moved {from} -> {}", memory.path);
    Ok(())
}
