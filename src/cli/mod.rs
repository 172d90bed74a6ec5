// src/cli/mod.rs
//! CLI definitions for pantry
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module.
//!
//! Recipe commands:
//! - `list` - List catalog recipes
//! - `show` - Show a recipe's metadata and options
//! - `validate` - Check a recipe for errors and warnings
//!
//! Generators:
//! - `header` - Render the configuration header
//! - `startup` - Render the startup CMake project
//!
//! Building:
//! - `cook` - Cook a recipe into a package directory

use clap::{Parser, Subcommand};
use pantry::recipe::OptionOverride;

#[derive(Parser)]
#[command(name = "pantry")]
#[command(author = "Pantry Contributors")]
#[command(version)]
#[command(about = "Recipes and generators for embedded firmware SDKs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the recipes in the built-in catalog
    List,

    /// Show a recipe's metadata and declared options
    Show {
        /// Catalog name or path to a recipe file
        recipe: String,

        /// Print the recipe as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a recipe
    Validate {
        /// Catalog name or path to a recipe file
        recipe: String,
    },

    /// Render the configuration header of a recipe
    Header {
        /// Catalog name or path to a recipe file
        recipe: String,

        /// Option override (repeatable)
        #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
        options: Vec<OptionOverride>,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Render the startup CMake project of a device pack recipe
    Startup {
        /// Catalog name or path to a recipe file
        recipe: String,

        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Cook a recipe from an unpacked source tree into a package directory
    Cook {
        /// Catalog name or path to a recipe file
        recipe: String,

        /// Unpacked upstream sources
        #[arg(long, value_name = "DIR")]
        source: String,

        /// Package directory to assemble
        #[arg(long, value_name = "DIR")]
        package: String,

        /// Option override (repeatable)
        #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
        options: Vec<OptionOverride>,

        /// Package directory of a cooked dependency (repeatable)
        #[arg(long = "dep", value_name = "NAME=DIR", value_parser = parse_dependency)]
        deps: Vec<(String, String)>,

        /// Number of parallel build jobs (default: available CPUs)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        jobs: Option<u32>,

        /// Value of %(build_type)s
        #[arg(long, default_value = "Release")]
        build_type: String,

        /// Only generate files and assemble the package, skip the native build
        #[arg(long)]
        no_build: bool,
    },
}

/// Parse a `NAME=DIR` dependency argument
fn parse_dependency(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, dir)) if !name.is_empty() && !dir.is_empty() => {
            Ok((name.to_string(), dir.to_string()))
        }
        _ => Err(format!("'{}' must look like NAME=DIR", s)),
    }
}
