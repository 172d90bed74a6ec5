// src/commands/mod.rs
//! Command handlers for the pantry CLI

mod cook;
mod generate;
mod recipe;

// Re-export all command handlers
pub use cook::cmd_cook;
pub use generate::{cmd_header, cmd_startup};
pub use recipe::{cmd_list, cmd_show, cmd_validate};

use anyhow::{Context, Result};
use pantry::recipe::{catalog, Recipe};
use std::path::Path;

/// Load a recipe by catalog name or file path
pub(crate) fn load_recipe(name_or_path: &str) -> Result<Recipe> {
    catalog::load(name_or_path).with_context(|| format!("Failed to load recipe: {}", name_or_path))
}

/// Write generated text to a file, or to stdout when no path is given
pub(crate) fn emit(content: &str, output: Option<&str>) -> Result<()> {
    match output {
        Some(path) => {
            let path = Path::new(path);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("[OK] Wrote {}", path.display());
        }
        None => print!("{}", content),
    }
    Ok(())
}
