//! CLI `list` and `describe` commands — browse the category index.

use anyhow::Result;

use super::OutputFormat;
use cortex::config::CortexConfig;
use cortex::memory::repository::ListOptions;
use cortex::path::CategoryPath;

/// Print the direct memories and subcategories of a category.
pub fn list(
    config: &CortexConfig,
    store: Option<&str>,
    category: &str,
    include_expired: bool,
    format: OutputFormat,
) -> Result<()> {
    let category = CategoryPath::parse(category)?;
    let repo = super::open_repository(config, store)?;
    let listing = repo.list(&category, ListOptions { include_expired })?;

    if super::print_structured(&listing, format)? {
        return Ok(());
    }

    let title = if category.is_root() {
        "(root)".to_string()
    } else {
        category.to_string()
    };
    println!("Category: {title}");
    println!("{}", "=".repeat(40));

    if listing.subcategories.is_empty() && listing.memories.is_empty() {
        println!("  (empty)");
        return Ok(());
    }

    if !listing.subcategories.is_empty() {
        println!("Subcategories:");
        for sub in &listing.subcategories {
            let name = format!("{}/", sub.path);
            match sub.description {
                Some(ref d) => println!("  {:<32} {:>4} memories  {}", name, sub.memory_count, d),
                None => println!("  {:<32} {:>4} memories", name, sub.memory_count),
            }
        }
        println!();
    }

    if !listing.memories.is_empty() {
        println!("Memories:");
        for entry in &listing.memories {
            println!("  {:<32} ~{} tokens", entry.path.to_string(), entry.token_estimate);
        }
    }

    Ok(())
}

/// Set or clear a category description.
pub fn describe(
    config: &CortexConfig,
    store: Option<&str>,
    category: &str,
    description: Option<String>,
) -> Result<()> {
    let category = CategoryPath::parse(category)?;
    let repo = super::open_repository(config, store)?;
    let cleared = description.is_none();
    repo.describe(&category, description)?;

    if cleared {
        println!("Cleared description for {category}");
    } else {
        println!("Updated description for {category}");
    }
    Ok(())
}
