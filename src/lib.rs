// src/lib.rs

//! Pantry: recipes for embedded firmware SDKs
//!
//! Configures and repackages the building blocks of a Cortex-M firmware
//! project (CMSIS, device family packs, FreeRTOS, the Harmony framework)
//! so a downstream build can consume them as ordinary packages.
//!
//! # Architecture
//!
//! - Recipes: TOML descriptions, a catalog of them compiled in
//! - Options: typed build and config options, resolved against overrides
//! - Header: deterministic C configuration header from config options
//! - Startup: CMake project building one startup object per device model
//! - Kitchen: cooks one recipe into a package directory

pub mod header;
pub mod recipe;
pub mod startup;

mod error;

pub use error::{Error, Result};
pub use header::{FormatRule, HeaderSpec};
pub use recipe::{Kitchen, KitchenConfig, Recipe};
pub use startup::StartupSection;
