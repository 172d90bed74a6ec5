// src/commands/cook.rs

//! Cook command - build packages from recipes

use super::load_recipe;
use anyhow::{Context, Result};
use pantry::recipe::{validate_recipe, Kitchen, KitchenConfig, OptionOverride};
use std::path::Path;
use tracing::info;

/// Cook a recipe into a package directory
///
/// # Arguments
/// * `recipe` - Catalog name or path to the recipe file
/// * `source_dir` - Unpacked upstream sources
/// * `package_dir` - Package directory to assemble
/// * `overrides` - Option overrides, last one wins
/// * `deps` - Package directories of cooked dependencies
/// * `jobs` - Number of parallel build jobs (None = auto)
/// * `build_type` - Value of `%(build_type)s`
/// * `no_build` - Skip the native build commands
#[allow(clippy::too_many_arguments)]
pub fn cmd_cook(
    recipe: &str,
    source_dir: &str,
    package_dir: &str,
    overrides: &[OptionOverride],
    deps: &[(String, String)],
    jobs: Option<u32>,
    build_type: &str,
    no_build: bool,
) -> Result<()> {
    let recipe = load_recipe(recipe)?;
    println!("Recipe: {} version {}", recipe.package.name, recipe.package.version);

    let warnings = validate_recipe(&recipe).with_context(|| "Recipe validation failed")?;
    for warning in &warnings {
        println!("Warning: {}", warning);
    }

    let options = recipe
        .options
        .resolve(overrides)
        .with_context(|| format!("Invalid options for {}", recipe.package.name))?;

    let mut config = KitchenConfig {
        build_type: build_type.to_string(),
        run_build: !no_build,
        ..Default::default()
    };
    if let Some(j) = jobs {
        config.jobs = j;
    }
    for (name, dir) in deps {
        config = config.with_dependency(name.as_str(), dir);
    }

    if no_build {
        println!("Cooking without native build...");
    } else {
        println!("Cooking with {} parallel jobs...", config.jobs);
    }

    let kitchen = Kitchen::new(config);
    let result = kitchen
        .cook(&recipe, &options, Path::new(source_dir), Path::new(package_dir))
        .with_context(|| format!("Failed to cook {}", recipe.package.name))?;

    for path in &result.generated {
        println!("  - Generated {}", path.display());
    }
    println!(
        "\n[COMPLETE] Cooked: {} ({} files)",
        result.package_dir.display(),
        result.copied
    );

    if !result.warnings.is_empty() {
        println!("\nBuild warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    info!(
        "Successfully cooked {} to {}",
        recipe.package.name,
        result.package_dir.display()
    );

    Ok(())
}
