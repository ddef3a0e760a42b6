//! Memory files and the repository that keeps them and the index in step.

pub mod format;
pub mod repository;
pub mod types;
