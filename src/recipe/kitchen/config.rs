// src/recipe/kitchen/config.rs

//! Configuration types for the Kitchen

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Configuration for the Kitchen
#[derive(Debug, Clone)]
pub struct KitchenConfig {
    /// Number of parallel jobs
    pub jobs: u32,
    /// Value of `%(build_type)s`
    pub build_type: String,
    /// Run the recipe's native build commands
    ///
    /// When false, cooking only generates files and assembles the package.
    pub run_build: bool,
    /// Package directories of already-cooked dependencies, by package name
    pub dependencies: IndexMap<String, PathBuf>,
}

impl Default for KitchenConfig {
    fn default() -> Self {
        let jobs = std::thread::available_parallelism()
            .map(|p| p.get() as u32)
            .unwrap_or(4);

        Self {
            jobs,
            build_type: "Release".to_string(),
            run_build: true,
            dependencies: IndexMap::new(),
        }
    }
}

impl KitchenConfig {
    /// Configuration that never runs native build commands
    pub fn generate_only() -> Self {
        Self {
            run_build: false,
            ..Self::default()
        }
    }

    /// Register the package directory of a dependency
    pub fn with_dependency(mut self, name: impl Into<String>, package_dir: impl AsRef<Path>) -> Self {
        self.dependencies
            .insert(name.into(), package_dir.as_ref().to_path_buf());
        self
    }

    pub fn dependency_dir(&self, name: &str) -> Option<&Path> {
        self.dependencies.get(name).map(|p| p.as_path())
    }
}

/// Result of cooking a recipe
#[derive(Debug)]
pub struct CookResult {
    /// Directory holding the assembled package
    pub package_dir: PathBuf,
    /// Files generated into the source tree (header, startup CMake)
    pub generated: Vec<PathBuf>,
    /// Number of files copied by layout rules
    pub copied: usize,
    /// Path of the written package info
    pub info_path: PathBuf,
    /// Build log
    pub log: String,
    /// Warnings generated during cooking
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kitchen_config_default() {
        let config = KitchenConfig::default();
        assert!(config.jobs > 0);
        assert!(config.run_build);
        assert_eq!(config.build_type, "Release");
        assert!(config.dependencies.is_empty());
    }

    #[test]
    fn test_generate_only() {
        let config = KitchenConfig::generate_only();
        assert!(!config.run_build);
    }

    #[test]
    fn test_with_dependency() {
        let config = KitchenConfig::default()
            .with_dependency("cmsis", "/pkgs/cmsis")
            .with_dependency("samv71-dfp", "/pkgs/dfp");

        assert_eq!(config.dependency_dir("cmsis"), Some(Path::new("/pkgs/cmsis")));
        assert!(config.dependency_dir("harmony").is_none());
    }
}
