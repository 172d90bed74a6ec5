// src/recipe/mod.rs

//! Recipe system for configuring and repackaging embedded SDKs
//!
//! Recipes define how one SDK becomes a consumable package, including:
//! - Upstream source archives and their checksums
//! - Build options and configuration options with their defaults
//! - Generated files (configuration header, startup CMake project)
//! - Native build instructions (configure, make, install)
//! - The package layout and the info exposed to consumers
//!
//! # Culinary Terminology
//!
//! - **Recipe**: The package description (like a recipe card)
//! - **Catalog**: The recipes compiled into the binary
//! - **Cook**: Produce a package directory from a recipe
//! - **Kitchen**: Where cooking happens
//! - **Prep**: Generate the header and startup project
//! - **Simmer**: Run the native build
//! - **Plate**: Lay out the package and write its info
//!
//! # Example Recipe
//!
//! ```toml
//! [package]
//! name = "freertos"
//! version = "11.1.0"
//! requires = ["cmsis/5.4.0"]
//!
//! [options.build]
//! heap = { default = "4", choices = ["1", "2", "3", "4", "5"] }
//!
//! [options.config]
//! configCPU_CLOCK_HZ = 20000000
//! configUSE_PREEMPTION = true
//!
//! [header]
//! path = "config/FreeRTOSConfig.h"
//! default_assert = true
//!
//! [header.rules]
//! configCPU_CLOCK_HZ = "unsigned_long_cast"
//!
//! [build]
//! configure = "cmake -S . -B build -DFREERTOS_HEAP=%(heap)s"
//! make = "cmake --build build"
//! ```

pub mod catalog;
mod format;
pub mod info;
mod kitchen;
pub mod options;
pub mod parser;

pub use format::{
    BuildSection, CopyOrigin, CopyRule, HeaderSection, PackageRef, PackageSection, Recipe,
    SourceSection,
};
pub use info::{Component, PackageInfo, INFO_FILE};
pub use kitchen::{apply_rule, Cook, CookResult, Kitchen, KitchenConfig};
pub use options::{OptionOverride, OptionTable, OptionValue, ResolvedOptions};
pub use parser::{parse_recipe, parse_recipe_file, validate_recipe};
