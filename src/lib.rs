//! Hierarchical memory for AI agents — categorized Markdown memories with a
//! derived category index, served over a CLI and MCP.
//!
//! Cortex keeps short text memories as files under category directories
//! inside one or more named stores:
//!
//! ```text
//! <store>/project/cortex/arch.md     memory "project/cortex/arch"
//! <store>/project/notes.md           memory "project/notes"
//! <store>/.index/...                 derived category index
//! ```
//!
//! The memory files are the source of truth. Each category also has an index
//! record listing its direct memories (with token estimates) and direct
//! subcategories (with memory counts and descriptions), so agents can browse
//! a store without reading every file.
//!
//! # Architecture
//!
//! - **Paths**: validated slug paths, compared structurally
//! - **Index**: per-category records maintained incrementally after every
//!   write, and rebuilt from scratch by `reindex`
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — Error taxonomy shared by every engine operation
//! - [`fs`] — Store-relative file primitives
//! - [`index`] — Category index engine: slugs, records, incremental updates, reindex
//! - [`memory`] — Memory files and the repository that keeps them indexed
//! - [`path`] — Category and memory path values
//! - [`store`] — Named stores and the shared repository registry

pub mod config;
pub mod error;
pub mod fs;
pub mod index;
pub mod memory;
pub mod path;
pub mod store;

pub use error::{Error, Result};
