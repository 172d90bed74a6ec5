// src/startup.rs

//! Startup build-description generator
//!
//! Device family packs ship one startup source per MCU model. Consumers need
//! those compiled as object files: the startup code is never called from the
//! program itself, so a static library member would be dropped by the linker
//! and the firmware would not boot. This module writes a small CMake project
//! that builds and installs one startup object per model, and describes the
//! resulting objects and linker scripts as package components.

use crate::error::{Error, Result};
use crate::recipe::info::Component;
use crate::recipe::options::is_identifier;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::Path;

/// The `[startup]` section of a recipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupSection {
    /// Model name prefix, e.g. `SAMV71`
    pub family: String,

    /// Variant codes, e.g. `["J19", "Q21"]`
    pub variants: Vec<String>,

    /// Model name suffix, e.g. the silicon revision `B`
    #[serde(default)]
    pub suffix: String,

    /// Include directory for startup compilation, relative to the source root
    pub include_dir: String,

    /// Directory holding `startup_<model>.c`, relative to the source root
    pub source_dir: String,

    /// Arguments of each `find_package(...)` call
    #[serde(default)]
    pub find_packages: Vec<String>,

    /// Libraries linked into every startup object
    #[serde(default)]
    pub link: Vec<String>,

    /// CMake project name
    #[serde(default = "default_project")]
    pub project: String,

    /// Where the generated CMake file goes, relative to the source root
    #[serde(default = "default_path")]
    pub path: String,

    /// Package component every startup component requires
    #[serde(default = "default_core_component")]
    pub core_component: String,

    /// Linker script directory inside the package
    #[serde(default = "default_ldscripts")]
    pub ldscripts: String,
}

fn default_project() -> String {
    "dfp_dummy".to_string()
}

fn default_path() -> String {
    "CMakeLists.txt".to_string()
}

fn default_core_component() -> String {
    "Core".to_string()
}

fn default_ldscripts() -> String {
    "lib/ldscripts".to_string()
}

impl StartupSection {
    /// Full model names, e.g. `SAMV71Q21B`
    pub fn models(&self) -> Vec<String> {
        self.variants
            .iter()
            .map(|v| format!("{}{}{}", self.family, v, self.suffix))
            .collect()
    }

    /// CMake object-library target for a model
    pub fn target_name(model: &str) -> String {
        format!("{}DefaultGCCStartup", model)
    }

    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(Error::invalid("Startup section lists no variants"));
        }
        for model in self.models() {
            if !is_identifier(&model) {
                return Err(Error::invalid(format!(
                    "Startup model '{}' is not a valid target name",
                    model
                )));
            }
        }
        if self.include_dir.trim().is_empty() || self.source_dir.trim().is_empty() {
            return Err(Error::invalid(
                "Startup section needs both include_dir and source_dir",
            ));
        }
        Ok(())
    }

    /// Render the CMake project compiling every startup object
    pub fn render_cmake(&self) -> Result<String> {
        self.validate()?;
        let models = self.models();

        let mut out = String::new();
        // Writing to a String cannot fail
        let _ = writeln!(out, "cmake_minimum_required(VERSION 3.20)");
        let _ = writeln!(out, "project({})", self.project);
        let _ = writeln!(out, "set(CMAKE_C_OUTPUT_EXTENSION .obj)");
        out.push('\n');

        if !self.find_packages.is_empty() {
            for package in &self.find_packages {
                let _ = writeln!(out, "find_package({})", package);
            }
            out.push('\n');
        }

        for model in &models {
            let target = Self::target_name(model);
            let _ = writeln!(out, "add_library({} OBJECT)", target);
            let _ = writeln!(
                out,
                "target_include_directories({} PRIVATE {})",
                target, self.include_dir
            );
            let _ = writeln!(
                out,
                "target_sources({} PRIVATE {}/startup_{}.c)",
                target,
                self.source_dir.trim_end_matches('/'),
                model.to_lowercase()
            );
            if !self.link.is_empty() {
                let _ = writeln!(
                    out,
                    "target_link_libraries({} PRIVATE {})",
                    target,
                    self.link.join(" ")
                );
            }
            out.push('\n');
        }

        for model in &models {
            let _ = writeln!(
                out,
                "install(FILES $<TARGET_OBJECTS:{}> DESTINATION lib)",
                Self::target_name(model)
            );
        }

        Ok(out)
    }

    /// Package components describing startup objects and linker scripts
    ///
    /// Linker flags embed `package_dir`, so consumers get absolute script paths.
    pub fn components(&self, package_dir: &Path) -> Vec<(String, Component)> {
        let ldscripts = package_dir.join(&self.ldscripts);
        let mut components = Vec::with_capacity(self.variants.len() * 3);

        for model in self.models() {
            let lower = model.to_lowercase();

            components.push((
                format!("{}::Startup", model),
                Component {
                    requires: vec![self.core_component.clone()],
                    objects: vec![format!("lib/startup_{}.c.obj", lower)],
                    ..Component::default()
                },
            ));
            components.push((
                format!("{}::Linker::Flash", model),
                Component {
                    exe_link_flags: vec![format!(
                        "-T{}",
                        ldscripts.join(format!("{}_flash.ld", lower)).display()
                    )],
                    ..Component::default()
                },
            ));
            components.push((
                format!("{}::Linker::SRAM", model),
                Component {
                    exe_link_flags: vec![format!(
                        "-T{}",
                        ldscripts.join(format!("{}_sram.ld", lower)).display()
                    )],
                    ..Component::default()
                },
            ));
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_STARTUP: &str = r#"
family = "SAMV71"
variants = ["Q21"]
suffix = "B"
include_dir = "samv71b/include"
source_dir = "samv71b/gcc/gcc"
find_packages = ["CMSIS COMPONENTS Core REQUIRED"]
link = ["CMSIS::Core"]
"#;

    fn sample() -> StartupSection {
        toml::from_str(SAMPLE_STARTUP).unwrap()
    }

    #[test]
    fn test_single_variant_cmake() {
        let cmake = sample().render_cmake().unwrap();
        assert_eq!(
            cmake,
            "cmake_minimum_required(VERSION 3.20)\n\
             project(dfp_dummy)\n\
             set(CMAKE_C_OUTPUT_EXTENSION .obj)\n\
             \n\
             find_package(CMSIS COMPONENTS Core REQUIRED)\n\
             \n\
             add_library(SAMV71Q21BDefaultGCCStartup OBJECT)\n\
             target_include_directories(SAMV71Q21BDefaultGCCStartup PRIVATE samv71b/include)\n\
             target_sources(SAMV71Q21BDefaultGCCStartup PRIVATE samv71b/gcc/gcc/startup_samv71q21b.c)\n\
             target_link_libraries(SAMV71Q21BDefaultGCCStartup PRIVATE CMSIS::Core)\n\
             \n\
             install(FILES $<TARGET_OBJECTS:SAMV71Q21BDefaultGCCStartup> DESTINATION lib)\n"
        );
    }

    #[test]
    fn test_targets_precede_installs() {
        let mut startup = sample();
        startup.variants = vec!["J19".into(), "N20".into(), "Q21".into()];

        let cmake = startup.render_cmake().unwrap();
        assert_eq!(cmake.matches("add_library(").count(), 3);
        assert_eq!(cmake.matches("install(FILES").count(), 3);

        let last_target = cmake.rfind("add_library(").unwrap();
        let first_install = cmake.find("install(FILES").unwrap();
        assert!(last_target < first_install);
        assert!(cmake.contains("startup_samv71n20b.c"));
    }

    #[test]
    fn test_empty_variants_rejected() {
        let mut startup = sample();
        startup.variants.clear();
        assert!(matches!(
            startup.render_cmake(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bad_model_name_rejected() {
        let mut startup = sample();
        startup.variants = vec!["Q 21".into()];
        assert!(startup.render_cmake().is_err());
    }

    #[test]
    fn test_components() {
        let components = sample().components(Path::new("/pkg"));
        assert_eq!(components.len(), 3);

        let (name, startup) = &components[0];
        assert_eq!(name, "SAMV71Q21B::Startup");
        assert_eq!(startup.requires, vec!["Core"]);
        assert_eq!(startup.objects, vec!["lib/startup_samv71q21b.c.obj"]);

        let (name, flash) = &components[1];
        assert_eq!(name, "SAMV71Q21B::Linker::Flash");
        assert_eq!(
            flash.exe_link_flags,
            vec!["-T/pkg/lib/ldscripts/samv71q21b_flash.ld"]
        );

        assert_eq!(components[2].0, "SAMV71Q21B::Linker::SRAM");
    }
}
