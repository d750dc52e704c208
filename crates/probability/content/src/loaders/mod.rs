//! Content loaders for reading selector catalogs from files.
//!
//! Catalogs are accepted as RON or TOML; the format is picked from the file
//! extension.

pub mod catalog;

pub use catalog::{CatalogFormat, CatalogLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
