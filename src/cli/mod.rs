pub mod add;
pub mod doctor;
pub mod inspect;
pub mod list;
pub mod reindex;
pub mod remove;
pub mod stores;
pub mod update;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::io::Read;

use cortex::config::CortexConfig;
use cortex::memory::repository::MemoryRepository;

/// Output format for commands that print structured data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Yaml,
}

/// Open the repository for `store` (or the configured default).
pub fn open_repository(config: &CortexConfig, store: Option<&str>) -> Result<MemoryRepository> {
    let root = config
        .resolve_store(store)
        .with_context(|| format!("failed to resolve store {}", config.store_name(store)))?;
    tracing::debug!(root = %root.display(), "opening store");
    Ok(MemoryRepository::open(root, config.update_options()))
}

/// Use `content` if given, otherwise read all of stdin.
pub fn content_or_stdin(content: Option<String>) -> Result<String> {
    match content {
        Some(content) => Ok(content),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read content from stdin")?;
            Ok(buf)
        }
    }
}

/// Print `value` as JSON or YAML. Returns `false` for `Text`, leaving it to the caller.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Text => Ok(false),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml_ng::to_string(value)?);
            Ok(true)
        }
    }
}
