//! CLI `init` and `stores` commands.

use anyhow::{Context, Result};

use cortex::config::CortexConfig;
use cortex::store::list_stores;

/// Create the store directory and build its (initially empty) index.
pub fn init(config: &CortexConfig, store: Option<&str>) -> Result<()> {
    let root = config.resolve_store(store)?;
    std::fs::create_dir_all(&root)
        .with_context(|| format!("failed to create store dir: {}", root.display()))?;

    let repo = super::open_repository(config, store)?;
    let result = repo.reindex()?;

    println!(
        "Initialized store {} at {} ({} categories indexed)",
        config.store_name(store),
        root.display(),
        result.categories_indexed
    );
    Ok(())
}

/// Print every configured or discovered store.
pub fn stores(config: &CortexConfig) -> Result<()> {
    let stores = list_stores(config);
    if stores.is_empty() {
        println!("No stores yet. Run `cortex init` to create the default store.");
        return Ok(());
    }

    println!("Stores");
    println!("{}", "=".repeat(40));
    for s in &stores {
        let marker = if s.is_default { "*" } else { " " };
        let state = if s.exists { "" } else { " (missing)" };
        println!("{marker} {:<16} {}{state}", s.name, s.path.display());
        if let Some(ref d) = s.description {
            println!("    {d}");
        }
    }
    Ok(())
}
