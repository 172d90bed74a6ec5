// src/recipe/info.rs

//! Package info: what a cooked package exposes to its consumers
//!
//! This is the metadata a downstream firmware build needs to use a package:
//! CMake file/target names, include directories, startup objects, and linker
//! flags per component. The kitchen writes it as `pantry-info.json` next to
//! the packaged files.

use crate::error::{Error, Result};
use crate::recipe::format::Recipe;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the package info written into every cooked package
pub const INFO_FILE: &str = "pantry-info.json";

/// The `[info]` section of a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoSection {
    /// Name of the generated CMake config file (`find_package` name)
    #[serde(default)]
    pub cmake_file_name: Option<String>,

    /// CMake modules included automatically by consumers
    #[serde(default)]
    pub build_modules: Vec<String>,

    /// Source directories shipped in the package
    #[serde(default)]
    pub src_dirs: Vec<String>,

    /// Named components
    #[serde(default)]
    pub components: IndexMap<String, Component>,
}

/// One consumable component of a package
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_dirs: Vec<String>,

    /// Other components this one needs, `Name` or `package::Name`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    /// Static libraries, by link name
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub libs: Vec<String>,

    /// Object files linked directly into executables
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exe_link_flags: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake_target_name: Option<String>,
}

/// Package info of one cooked package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmake_file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub build_modules: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub src_dirs: Vec<String>,

    #[serde(default)]
    pub components: IndexMap<String, Component>,
}

impl PackageInfo {
    /// Assemble package info from a recipe
    ///
    /// Declared components come first, followed by the per-model startup
    /// components when the recipe has a `[startup]` section.
    pub fn from_recipe(recipe: &Recipe, package_dir: &Path) -> Self {
        let info = recipe.info.clone().unwrap_or_default();
        let mut components = info.components;

        if let Some(startup) = &recipe.startup {
            components.extend(startup.components(package_dir));
        }

        Self {
            name: recipe.package.name.clone(),
            version: recipe.package.version.clone(),
            requires: recipe.package.requires.clone(),
            cmake_file_name: info.cmake_file_name,
            build_modules: info.build_modules,
            src_dirs: info.src_dirs,
            components,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::ParseError(format!("Failed to serialize package info: {}", e)))
    }

    /// Write `pantry-info.json` into `package_dir`
    pub fn write(&self, package_dir: &Path) -> Result<std::path::PathBuf> {
        let path = package_dir.join(INFO_FILE);
        std::fs::write(&path, self.to_json()?)
            .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
        Ok(path)
    }

    /// Read package info back from a cooked package
    pub fn read(package_dir: &Path) -> Result<Self> {
        let path = package_dir.join(INFO_FILE);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::IoError(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::ParseError(format!("Invalid package info {}: {}", path.display(), e)))
    }
}
