//! Catalog inspection commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use nearby_core::Category;

/// Sub-commands available under `catalog`.
#[derive(Debug, Subcommand)]
pub enum CatalogCommands {
    /// Load and validate a catalog file, then print per-category counts
    Check {
        /// Catalog YAML file (defaults to `NEARBY_CATALOG_PATH`)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

/// Validate the catalog at `path` and summarize it.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails validation.
pub(crate) fn run_catalog_check(path: &Path) -> anyhow::Result<()> {
    let catalog = nearby_core::load_catalog(path)
        .map_err(|e| anyhow::anyhow!("catalog {} is invalid: {e}", path.display()))?;

    println!("{}: {} places", path.display(), catalog.len());
    for (category, count) in catalog.category_counts() {
        println!("  {:<16} {count}", category_heading(category));
    }
    Ok(())
}

pub(crate) fn print_categories() {
    for category in Category::ALL {
        println!("{:<12} {}", category.as_str(), category_heading(category));
    }
}

pub(crate) fn category_heading(category: Category) -> String {
    format!("{} {}", category.icon(), category.label())
}
