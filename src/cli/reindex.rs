//! CLI `reindex` and `prune` commands.

use anyhow::Result;

use cortex::config::CortexConfig;

/// Rebuild the category index of a store from its memory files.
pub fn reindex(config: &CortexConfig, store: Option<&str>) -> Result<()> {
    let repo = super::open_repository(config, store)?;

    println!("Rebuilding index for store {}...", config.store_name(store));
    let result = repo.reindex()?;

    println!("  Categories indexed:   {}", result.categories_indexed);
    println!("  Stale records removed: {}", result.stale_removed);

    if !result.warnings.is_empty() {
        println!();
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  {warning}");
        }
    }

    Ok(())
}

/// Remove (or with `dry_run`, list) expired memories.
pub fn prune(config: &CortexConfig, store: Option<&str>, dry_run: bool) -> Result<()> {
    let repo = super::open_repository(config, store)?;
    let result = repo.prune(chrono::Utc::now(), dry_run)?;

    if result.pruned.is_empty() {
        println!("No expired memories.");
        return Ok(());
    }

    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!("{verb} {} expired memories:", result.pruned.len());
    for path in &result.pruned {
        println!("  {path}");
    }
    Ok(())
}
