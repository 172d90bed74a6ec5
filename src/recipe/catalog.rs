// src/recipe/catalog.rs

//! Built-in recipe catalog
//!
//! The recipes under `recipes/` are compiled into the binary so every
//! command works without a checkout. A recipe can still be loaded from any
//! TOML file on disk.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use crate::recipe::parser::{parse_recipe, parse_recipe_file};
use std::path::Path;
use tracing::debug;

const CATALOG: &[(&str, &str)] = &[
    ("cmsis", include_str!("../../recipes/cmsis.toml")),
    ("samv71-dfp", include_str!("../../recipes/samv71-dfp.toml")),
    ("freertos", include_str!("../../recipes/freertos.toml")),
    ("harmony-csp", include_str!("../../recipes/harmony-csp.toml")),
    ("harmony-mhc", include_str!("../../recipes/harmony-mhc.toml")),
    ("harmony", include_str!("../../recipes/harmony.toml")),
];

/// Names of all built-in recipes, in catalog order
pub fn names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|(name, _)| *name)
}

/// Raw TOML of a built-in recipe
pub fn source(name: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, content)| *content)
}

/// Parse a built-in recipe by name
pub fn builtin(name: &str) -> Result<Recipe> {
    let content = source(name)
        .ok_or_else(|| Error::NotFound(format!("No recipe named '{}' in the catalog", name)))?;
    parse_recipe(content)
}

/// Parse every built-in recipe
pub fn all() -> Result<Vec<Recipe>> {
    names().map(builtin).collect()
}

/// Load a recipe from a file path, falling back to the catalog by name
pub fn load(name_or_path: &str) -> Result<Recipe> {
    let path = Path::new(name_or_path);
    if path.is_file() {
        debug!("Loading recipe from {}", path.display());
        return parse_recipe_file(path);
    }
    debug!("Loading built-in recipe {}", name_or_path);
    builtin(name_or_path)
}

/// Requirements of `recipes` that no catalog recipe satisfies
///
/// A requirement is satisfied by a catalog recipe with the same name and
/// version.
pub fn missing_requires(recipes: &[Recipe]) -> Result<Vec<String>> {
    let catalog = all()?;
    let mut missing = Vec::new();

    for recipe in recipes {
        for req in recipe.requirements()? {
            let found = catalog
                .iter()
                .any(|r| r.package.name == req.name && r.package.version == req.version);
            if !found {
                missing.push(format!("{} requires {}", recipe.package.name, req));
            }
        }
    }

    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_names() {
        let names: Vec<&str> = names().collect();
        assert_eq!(
            names,
            vec!["cmsis", "samv71-dfp", "freertos", "harmony-csp", "harmony-mhc", "harmony"]
        );
    }

    #[test]
    fn test_builtin_names_match_package_names() {
        for name in names() {
            let recipe = builtin(name).unwrap();
            assert_eq!(recipe.package.name, name);
        }
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(matches!(builtin("zephyr"), Err(Error::NotFound(_))));
        assert!(matches!(load("zephyr"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.toml");
        std::fs::write(
            &path,
            r#"
[package]
name = "local"
version = "0.1"
"#,
        )
        .unwrap();

        let recipe = load(path.to_str().unwrap()).unwrap();
        assert_eq!(recipe.package.name, "local");
    }

    #[test]
    fn test_catalog_requirements_are_satisfied() {
        let recipes = all().unwrap();
        assert!(missing_requires(&recipes).unwrap().is_empty());
    }

    #[test]
    fn test_missing_requires_reported() {
        let recipe = parse_recipe(
            r#"
[package]
name = "app"
version = "1.0"
requires = ["cmsis/5.4.0", "cmsis/6.0.0"]
"#,
        )
        .unwrap();

        let missing = missing_requires(&[recipe]).unwrap();
        assert_eq!(missing, vec!["app requires cmsis/6.0.0"]);
    }
}
