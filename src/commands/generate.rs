// src/commands/generate.rs

//! Generator commands - configuration header and startup project

use super::{emit, load_recipe};
use anyhow::{Context, Result};
use pantry::recipe::OptionOverride;
use tracing::info;

/// Render a recipe's configuration header with option overrides applied
pub fn cmd_header(recipe: &str, overrides: &[OptionOverride], output: Option<&str>) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let options = recipe
        .options
        .resolve(overrides)
        .with_context(|| format!("Invalid options for {}", recipe.package.name))?;

    let header = recipe
        .render_header(&options.config)
        .with_context(|| format!("Failed to render header for {}", recipe.package.name))?;

    info!(
        "Rendered header for {} ({} config options)",
        recipe.package.name,
        options.config.len()
    );
    emit(&header, output)
}

/// Render a device pack's startup CMake project
pub fn cmd_startup(recipe: &str, output: Option<&str>) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    let cmake = recipe
        .render_startup()
        .with_context(|| format!("Failed to render startup project for {}", recipe.package.name))?;

    emit(&cmake, output)
}
