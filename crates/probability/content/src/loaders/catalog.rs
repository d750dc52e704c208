//! Selector catalog loader.

use std::path::Path;

use anyhow::Context;
use probability_core::ProbabilityError;

use crate::loaders::{LoadResult, read_file};
use crate::spec::Catalog;

/// On-disk catalog syntax.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogFormat {
    Ron,
    Toml,
}

impl CatalogFormat {
    /// Detects the format from a file extension (`.ron` or `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("ron") {
            Some(Self::Ron)
        } else if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else {
            None
        }
    }
}

/// Loader for selector catalogs.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load and validate a catalog file.
    ///
    /// Advisories (heavy non-repeatable entries, empty selectors) are logged
    /// as warnings and do not fail the load.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let format = CatalogFormat::from_path(path).ok_or_else(|| {
            anyhow::anyhow!(
                "Unsupported catalog extension for {} (expected .ron or .toml)",
                path.display()
            )
        })?;
        let content = read_file(path)?;

        let catalog = Self::parse(&content, format)
            .with_context(|| format!("Failed to load catalog {}", path.display()))?;

        tracing::info!(
            path = %path.display(),
            selectors = catalog.selectors.len(),
            "Loaded selector catalog"
        );

        Ok(catalog)
    }

    /// Parse and validate catalog text.
    pub fn parse(content: &str, format: CatalogFormat) -> LoadResult<Catalog> {
        let catalog: Catalog = match format {
            CatalogFormat::Ron => ron::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?,
            CatalogFormat::Toml => toml::from_str(content)
                .map_err(|e| anyhow::anyhow!("Failed to parse catalog TOML: {}", e))?,
        };

        if let Err(err) = catalog.validate() {
            tracing::error!(
                code = err.error_code(),
                severity = err.severity().as_str(),
                "{}",
                err
            );
            return Err(err.into());
        }

        for advisory in catalog.advisories() {
            tracing::warn!("{}", advisory);
        }

        Ok(catalog)
    }
}
