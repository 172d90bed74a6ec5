// src/recipe/kitchen/mod.rs

//! Kitchen: where recipes are cooked into packages
//!
//! The Kitchen takes an unpacked source tree and a set of resolved options
//! and produces a package directory. It handles:
//! - Generating the configuration header and startup CMake project
//! - Running the recipe's native build commands
//! - Copying files into the package layout
//! - Writing the package info consumers read

mod config;
mod cook;
mod layout;

pub use config::{CookResult, KitchenConfig};
pub use cook::Cook;
pub use layout::apply_rule;

use crate::error::{Error, Result};
use crate::recipe::format::{CopyOrigin, Recipe};
use crate::recipe::options::ResolvedOptions;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The Kitchen: where recipes are cooked
pub struct Kitchen {
    pub(crate) config: KitchenConfig,
}

impl Kitchen {
    /// Create a new Kitchen with the given configuration
    pub fn new(config: KitchenConfig) -> Self {
        Self { config }
    }

    /// Create a Kitchen with default configuration
    pub fn with_defaults() -> Self {
        Self::new(KitchenConfig::default())
    }

    pub fn config(&self) -> &KitchenConfig {
        &self.config
    }

    /// Cook a recipe from an unpacked source tree into `package_dir`
    ///
    /// ## Cooking Process
    /// 1. **Prep**: Write the generated header and startup project into the sources
    /// 2. **Simmer**: Run configure/make/install (skipped when `run_build` is off)
    /// 3. **Plate**: Apply layout rules and write package info
    ///
    /// Dependencies named by `dep:` layout rules must be registered in the
    /// kitchen configuration before cooking starts.
    pub fn cook(
        &self,
        recipe: &Recipe,
        options: &ResolvedOptions,
        source_dir: &Path,
        package_dir: &Path,
    ) -> Result<CookResult> {
        info!(
            "Cooking {} version {}",
            recipe.package.name, recipe.package.version
        );

        let missing = self.missing_dependencies(recipe);
        if !missing.is_empty() {
            return Err(Error::NotFound(format!(
                "No package directory for dependencies: {}",
                missing.join(", ")
            )));
        }

        let mut cook = Cook::new(self, recipe, options, source_dir, package_dir)?;

        info!("Prep: generating files...");
        cook.prep()?;

        info!("Simmering: running build...");
        cook.simmer()?;

        info!("Plating: assembling package...");
        cook.plate()
    }

    /// Dependencies used as copy origins that have no registered directory
    pub fn missing_dependencies(&self, recipe: &Recipe) -> Vec<String> {
        let mut missing: Vec<String> = Vec::new();
        for rule in &recipe.layout {
            if let CopyOrigin::Dependency(name) = &rule.from
                && self.config.dependency_dir(name).is_none()
                && !missing.contains(name)
            {
                missing.push(name.clone());
            }
        }
        missing
    }

    /// Parallel jobs for a recipe: its own setting, else the kitchen's
    pub fn jobs_for(&self, recipe: &Recipe) -> u32 {
        recipe
            .build
            .as_ref()
            .and_then(|b| b.jobs)
            .unwrap_or(self.config.jobs)
    }

    /// Variables available to commands and layout destinations
    ///
    /// `destdir`, `srcdir`, `build_type`, `jobs`, every build option by name,
    /// and `<dep>.path` for each registered dependency. Recipe `name`,
    /// `version`, `<dep>.version` and `[variables]` are resolved by
    /// [`Recipe::substitute`] itself.
    pub fn substitution_context(
        &self,
        recipe: &Recipe,
        options: &ResolvedOptions,
        source_dir: &Path,
        package_dir: &Path,
    ) -> Result<IndexMap<String, String>> {
        let mut context = IndexMap::new();
        context.insert(
            "destdir".to_string(),
            package_dir.to_string_lossy().to_string(),
        );
        context.insert(
            "srcdir".to_string(),
            source_dir.to_string_lossy().to_string(),
        );
        context.insert("build_type".to_string(), self.config.build_type.clone());
        context.insert("jobs".to_string(), self.jobs_for(recipe).to_string());

        for (name, value) in &options.build {
            context.insert(name.clone(), value.to_string());
        }
        for (name, dir) in &self.config.dependencies {
            context.insert(
                format!("{}.path", name),
                absolute(dir)?.to_string_lossy().to_string(),
            );
        }

        debug!("Substitution context has {} variables", context.len());
        Ok(context)
    }
}

/// Resolve `path` against the current directory without touching symlinks
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| {
        Error::IoError(format!("Failed to resolve {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::parser::parse_recipe;
    use std::fs;

    const RECIPE: &str = r#"
[package]
name = "rtos"
version = "1.0"

[options.build]
heap = { default = "4", choices = ["1", "2", "3", "4", "5"] }

[options.config]
configUSE_PREEMPTION = true
configTICK_RATE_HZ = 1000

[header]
path = "config/RtosConfig.h"

[build]
configure = "echo heap=%(heap)s type=%(build_type)s > configure.log"
make = "echo $MAKEFLAGS > make.log && mkdir -p lib && echo lib > lib/librtos.a"
install = "mkdir -p $DESTDIR/installed && cp lib/librtos.a $DESTDIR/installed/"

[[layout]]
pattern = "*.h"
src = "config"
dst = "include"

[[layout]]
pattern = "*.a"
src = "lib"
dst = "lib"
"#;

    fn source_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("config")).unwrap();
        dir
    }

    #[test]
    fn test_substitution_context() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let options = recipe.options.defaults();
        let kitchen = Kitchen::new(KitchenConfig {
            jobs: 3,
            ..KitchenConfig::default().with_dependency("cmsis", "/pkgs/cmsis")
        });

        let ctx = kitchen.substitution_context(
            &recipe,
            &options,
            Path::new("/src"),
            Path::new("/pkg"),
        )
        .unwrap();
        assert_eq!(ctx.get("destdir").map(String::as_str), Some("/pkg"));
        assert_eq!(ctx.get("srcdir").map(String::as_str), Some("/src"));
        assert_eq!(ctx.get("jobs").map(String::as_str), Some("3"));
        assert_eq!(ctx.get("heap").map(String::as_str), Some("4"));
        assert_eq!(ctx.get("cmsis.path").map(String::as_str), Some("/pkgs/cmsis"));
        // Config options only feed the header
        assert!(!ctx.contains_key("configTICK_RATE_HZ"));
    }

    #[test]
    fn test_cook_runs_build() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let options = recipe
            .options
            .resolve(&["heap=2".parse().unwrap()])
            .unwrap();
        let src = source_tree();
        let pkg = tempfile::tempdir().unwrap();

        let kitchen = Kitchen::new(KitchenConfig {
            jobs: 2,
            ..KitchenConfig::default()
        });
        let result = kitchen.cook(&recipe, &options, src.path(), pkg.path()).unwrap();

        assert_eq!(
            fs::read_to_string(src.path().join("configure.log")).unwrap().trim(),
            "heap=2 type=Release"
        );
        assert_eq!(
            fs::read_to_string(src.path().join("make.log")).unwrap().trim(),
            "-j2"
        );
        assert!(pkg.path().join("installed/librtos.a").is_file());
        assert!(pkg.path().join("include/RtosConfig.h").is_file());
        assert!(pkg.path().join("lib/librtos.a").is_file());
        assert_eq!(result.copied, 2);
        assert!(result.log.contains("=== configure ==="));
        assert!(result.info_path.is_file());
    }

    #[test]
    fn test_cook_failing_step() {
        let content = RECIPE.replace(
            "make = \"echo $MAKEFLAGS > make.log && mkdir -p lib && echo lib > lib/librtos.a\"",
            "make = \"exit 3\"",
        );
        let recipe = parse_recipe(&content).unwrap();
        let options = recipe.options.defaults();
        let src = source_tree();
        let pkg = tempfile::tempdir().unwrap();

        let err = Kitchen::with_defaults()
            .cook(&recipe, &options, src.path(), pkg.path())
            .unwrap_err();
        assert!(matches!(err, Error::BuildFailed(_)));
        assert!(err.to_string().contains("make phase failed"));
    }

    #[test]
    fn test_cook_unresolved_variable() {
        let content = RECIPE.replace("%(build_type)s", "%(cmsis.path)s");
        let recipe = parse_recipe(&content).unwrap();
        let options = recipe.options.defaults();
        let src = source_tree();
        let pkg = tempfile::tempdir().unwrap();

        let err = Kitchen::with_defaults()
            .cook(&recipe, &options, src.path(), pkg.path())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(err.to_string().contains("%(cmsis.path)s"));
    }

    #[test]
    fn test_cook_missing_source_dir() {
        let recipe = parse_recipe(RECIPE).unwrap();
        let options = recipe.options.defaults();
        let pkg = tempfile::tempdir().unwrap();

        let result = Kitchen::new(KitchenConfig::generate_only()).cook(
            &recipe,
            &options,
            Path::new("/nonexistent/source"),
            pkg.path(),
        );
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_missing_dependencies() {
        let content = format!(
            "{}\n[[layout]]\npattern = \"*\"\nfrom = \"dep:cmsis\"\ndst = \"cmsis\"\n",
            RECIPE
        );
        let recipe = parse_recipe(&content).unwrap();

        let kitchen = Kitchen::with_defaults();
        assert_eq!(kitchen.missing_dependencies(&recipe), vec!["cmsis"]);

        let kitchen = Kitchen::new(KitchenConfig::default().with_dependency("cmsis", "/pkgs/cmsis"));
        assert!(kitchen.missing_dependencies(&recipe).is_empty());
    }
}
