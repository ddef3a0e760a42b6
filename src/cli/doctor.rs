//! CLI `doctor` command — compare the index with the memory files and print a health report.

use anyhow::{Context, Result};

use cortex::config::CortexConfig;

/// Run index diagnostics and print a health report.
pub fn doctor(config: &CortexConfig, store: Option<&str>) -> Result<()> {
    let root = config.resolve_store(store)?;

    if !root.exists() {
        println!("Store: not found at {}", root.display());
        println!("Run `cortex init` or `cortex add` to create it.");
        return Ok(());
    }

    let repo = super::open_repository(config, store)?;
    let report = repo.check().context("failed to scan store")?;
    let stored = repo
        .index()
        .list_categories()
        .context("failed to list index records")?;

    println!("Cortex Health Report");
    println!("====================");
    println!();
    println!("Store:             {} ({})", config.store_name(store), root.display());
    println!("Index records:     {}", stored.len());
    println!();

    let sections = [
        ("Missing records", &report.missing),
        ("Stale records", &report.stale),
        ("Orphaned records", &report.orphaned),
    ];
    for (label, categories) in sections {
        println!("{label:<18} {}", categories.len());
        for category in categories.iter() {
            let name = if category.is_root() {
                "(root)".to_string()
            } else {
                category.to_string()
            };
            println!("  - {name}");
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!("Name warnings:");
        for warning in &report.warnings {
            println!("  {warning}");
        }
    }

    println!();
    if report.is_healthy() {
        println!("Index check:       PASSED");
    } else {
        println!("Index check:       FAILED");
        println!();
        println!("Recovery steps:");
        println!("  cortex reindex{}", store.map(|s| format!(" --store {s}")).unwrap_or_default());
    }

    Ok(())
}
