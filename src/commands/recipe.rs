// src/commands/recipe.rs

//! Recipe commands - list, show and validate recipes

use super::load_recipe;
use anyhow::{Context, Result};
use pantry::recipe::{catalog, validate_recipe};

/// List the recipes in the built-in catalog
pub fn cmd_list() -> Result<()> {
    let recipes = catalog::all().context("Failed to parse the built-in catalog")?;

    println!("Catalog ({} recipes):", recipes.len());
    for recipe in &recipes {
        let description = recipe.package.description.as_deref().unwrap_or("");
        println!(
            "  {:<14} {:<10} {}",
            recipe.package.name, recipe.package.version, description
        );
    }

    Ok(())
}

/// Show a recipe's metadata and declared options
pub fn cmd_show(recipe: &str, json: bool) -> Result<()> {
    let recipe = load_recipe(recipe)?;

    if json {
        let out = serde_json::to_string_pretty(&recipe).context("Failed to serialize recipe")?;
        println!("{}", out);
        return Ok(());
    }

    let pkg = &recipe.package;
    println!("Recipe: {} version {}", pkg.name, pkg.version);
    if let Some(desc) = &pkg.description {
        println!("  {}", desc);
    }
    if let Some(license) = &pkg.license {
        println!("License: {}", license);
    }
    if let Some(homepage) = &pkg.homepage {
        println!("Homepage: {}", homepage);
    }
    if let Some(url) = recipe.archive_url() {
        println!("Source: {}", url);
    }
    if !pkg.requires.is_empty() {
        println!("Requires: {}", pkg.requires.join(", "));
    }

    for (title, decls) in [
        ("Build options", &recipe.options.build),
        ("Config options", &recipe.options.config),
    ] {
        if decls.is_empty() {
            continue;
        }
        println!("\n{} ({}):", title, decls.len());
        for (name, decl) in decls {
            println!("  {} = {} ({})", name, decl.default_value(), decl.kind());
        }
    }

    if let Some(header) = &recipe.header {
        println!("\nHeader: {} (guard {})", header.path, header.guard());
    }
    if let Some(startup) = &recipe.startup {
        println!("\nStartup models: {}", startup.models().join(", "));
    }

    Ok(())
}

/// Validate a recipe and report warnings
pub fn cmd_validate(recipe: &str) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let missing = catalog::missing_requires(std::slice::from_ref(&recipe))
        .context("Failed to check requirements")?;
    for m in &missing {
        println!("Warning: {} (not in catalog)", m);
    }

    if warnings.is_empty() && missing.is_empty() {
        println!("[OK] No issues found");
    } else {
        println!("[OK] {} warning(s)", warnings.len() + missing.len());
    }

    Ok(())
}
