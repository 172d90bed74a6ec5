// src/recipe/parser.rs

//! Recipe file parsing and validation

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use std::path::Path;

/// Parse a recipe from a TOML string
pub fn parse_recipe(content: &str) -> Result<Recipe> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid recipe: {}", e)))
}

/// Parse a recipe from a file
pub fn parse_recipe_file(path: &Path) -> Result<Recipe> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("Failed to read recipe file: {}", e)))?;

    parse_recipe(&content)
}

/// Validate a recipe for completeness and correctness
///
/// Returns warnings for recoverable issues. The header, if any, must render
/// with the default option values.
pub fn validate_recipe(recipe: &Recipe) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    // Check for empty name/version
    if recipe.package.name.is_empty() {
        return Err(Error::ParseError("Recipe package name cannot be empty".to_string()));
    }
    if recipe.package.version.is_empty() {
        return Err(Error::ParseError("Recipe package version cannot be empty".to_string()));
    }

    recipe.requirements()?;

    if let Some(source) = &recipe.source {
        match &source.checksum {
            Some(checksum)
                if !checksum.starts_with("sha256:") && !checksum.starts_with("sha512:") =>
            {
                return Err(Error::ParseError(format!(
                    "Invalid checksum format: {}. Expected sha256:... or sha512:...",
                    checksum
                )));
            }
            Some(_) => {}
            None => warnings.push(format!("Source {} has no checksum", source.archive)),
        }
    }

    recipe.options.validate()?;

    if let Some(header) = &recipe.header {
        for name in header.rules.keys() {
            if !recipe.options.config.contains_key(name) {
                warnings.push(format!("Header rule for undeclared option {}", name));
            }
        }
        for name in &header.exclude {
            if !recipe.options.config.contains_key(name) {
                warnings.push(format!("Header excludes undeclared option {}", name));
            }
        }
        if recipe.options.config.is_empty() {
            warnings.push("Header has no config options to define".to_string());
        }

        recipe
            .render_header(&recipe.options.defaults().config)
            .map_err(|e| match e {
                Error::InvalidConfiguration(msg) => Error::InvalidConfiguration(format!(
                    "Header does not render with default options: {}",
                    msg
                )),
                other => other,
            })?;
    } else if !recipe.options.config.is_empty() {
        warnings.push("Config options declared but no [header] section".to_string());
    }

    if let Some(startup) = &recipe.startup {
        startup.validate()?;
    }

    // Install steps already run with DESTDIR set to the package directory
    if let Some(build) = &recipe.build {
        for (phase, cmd) in build.steps() {
            if cmd.to_ascii_lowercase().contains("prefix=%(destdir)s") {
                warnings.push(format!(
                    "{} sets the install prefix to %(destdir)s, which DESTDIR already adds",
                    phase
                ));
            }
        }
    }

    for rule in &recipe.layout {
        glob::Pattern::new(&rule.pattern).map_err(|e| {
            Error::ParseError(format!("Invalid layout pattern '{}': {}", rule.pattern, e))
        })?;
    }

    // Warn about missing fields
    if recipe.package.description.is_none() {
        warnings.push("Missing package description".to_string());
    }
    if recipe.package.license.is_none() {
        warnings.push("Missing package license".to_string());
    }

    Ok(warnings)
}
