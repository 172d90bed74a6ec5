// src/recipe/format.rs

//! Recipe file format definitions
//!
//! Recipes are TOML files describing how to configure and repackage one
//! SDK: where the sources come from, which options it takes, which files
//! get generated, which native build commands run, and which files end up
//! in the package.

use crate::error::{Error, Result};
use crate::header::{guard_for_path, FormatRule, HeaderSpec};
use crate::recipe::info::InfoSection;
use crate::recipe::options::{OptionTable, OptionsSection};
use crate::startup::StartupSection;
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete recipe for one package
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Package metadata
    pub package: PackageSection,

    /// Upstream source archive (absent for metapackages)
    #[serde(default)]
    pub source: Option<SourceSection>,

    /// Declared build and config options
    #[serde(default)]
    pub options: OptionsSection,

    /// Configuration header generated from the config options
    #[serde(default)]
    pub header: Option<HeaderSection>,

    /// Startup-object CMake project generated for device packs
    #[serde(default)]
    pub startup: Option<StartupSection>,

    /// Native build commands
    #[serde(default)]
    pub build: Option<BuildSection>,

    /// Copy rules assembling the package directory
    #[serde(default)]
    pub layout: Vec<CopyRule>,

    /// Metadata exposed to consumers
    #[serde(default)]
    pub info: Option<InfoSection>,

    /// Variables for substitution
    #[serde(default)]
    pub variables: IndexMap<String, String>,
}

impl Recipe {
    /// Substitute variables in a string
    ///
    /// Replaces `%(name)s` patterns with, in order:
    /// 1. Built-in variables (`name`, `version`)
    /// 2. `<dep>.version` for every requirement
    /// 3. Custom variables from the `[variables]` section
    /// 4. Caller-provided context (destdir, build options, ...)
    pub fn substitute(&self, template: &str, context: &IndexMap<String, String>) -> String {
        let mut result = template.to_string();

        result = result.replace("%(name)s", &self.package.name);
        result = result.replace("%(version)s", &self.package.version);

        for req in self.requirements().unwrap_or_default() {
            result = result.replace(&format!("%({}.version)s", req.name), &req.version);
        }

        for (key, value) in self.variables.iter().chain(context.iter()) {
            result = result.replace(&format!("%({})s", key), value);
        }

        result
    }

    /// Get the archive URL with variables substituted
    pub fn archive_url(&self) -> Option<String> {
        self.source
            .as_ref()
            .map(|s| self.substitute(&s.archive, &IndexMap::new()))
    }

    /// Parse every `requires` entry
    pub fn requirements(&self) -> Result<Vec<PackageRef>> {
        self.package.requires.iter().map(|r| r.parse()).collect()
    }

    /// Render the configuration header for a config option table
    pub fn render_header(&self, config: &OptionTable) -> Result<String> {
        let header = self.header.as_ref().ok_or_else(|| {
            Error::NotFound(format!(
                "Recipe {} does not generate a configuration header",
                self.package.name
            ))
        })?;
        crate::header::render(config, &header.spec())
    }

    /// Render the startup CMake project
    pub fn render_startup(&self) -> Result<String> {
        let startup = self.startup.as_ref().ok_or_else(|| {
            Error::NotFound(format!(
                "Recipe {} does not build startup objects",
                self.package.name
            ))
        })?;
        startup.render_cmake()
    }
}

/// Package metadata section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package name
    pub name: String,

    /// Package version
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,

    /// License identifier (SPDX or `Proprietary`)
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub homepage: Option<String>,

    #[serde(default)]
    pub topics: Vec<String>,

    /// Packages this one is built against, as `name/version`
    #[serde(default)]
    pub requires: Vec<String>,
}

/// A `name/version` reference to another package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    pub name: String,
    pub version: String,
}

impl FromStr for PackageRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((name, version))
                if !name.is_empty() && !version.is_empty() && !version.contains('/') =>
            {
                Ok(Self {
                    name: name.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(Error::ParseError(format!(
                "Invalid package reference '{}', expected name/version",
                s
            ))),
        }
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// Source archive section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    /// Source archive URL
    ///
    /// Supports `%(version)s` substitution.
    pub archive: String,

    /// Checksum for the archive (`sha256:...` or `sha512:...`)
    #[serde(default)]
    pub checksum: Option<String>,
}

/// Configuration header section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderSection {
    /// Output path, relative to the source root
    pub path: String,

    /// Include guard; derived from the file name when absent
    #[serde(default)]
    pub guard: Option<String>,

    /// Append the default `configASSERT` definition
    #[serde(default)]
    pub default_assert: bool,

    /// Config options left out of the header
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Rendering overrides by option name
    #[serde(default)]
    pub rules: IndexMap<String, FormatRule>,
}

impl HeaderSection {
    pub fn guard(&self) -> String {
        self.guard
            .clone()
            .unwrap_or_else(|| guard_for_path(&self.path))
    }

    pub fn spec(&self) -> HeaderSpec {
        HeaderSpec {
            guard: self.guard(),
            rules: self.rules.clone(),
            exclude: self.exclude.iter().cloned().collect::<IndexSet<_>>(),
            default_assert: self.default_assert,
        }
    }
}

/// Build instructions section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSection {
    /// Configure command
    ///
    /// Supports `%(variable)s` substitution.
    #[serde(default)]
    pub configure: Option<String>,

    /// Make/build command
    #[serde(default)]
    pub make: Option<String>,

    /// Install command
    ///
    /// Runs with `DESTDIR` set to the package directory, so the install
    /// prefix stays `/`.
    #[serde(default)]
    pub install: Option<String>,

    /// Environment variables to set during build
    #[serde(default)]
    pub environment: IndexMap<String, String>,

    /// Working directory within source (relative path)
    #[serde(default)]
    pub workdir: Option<String>,

    /// Number of parallel jobs (default: kitchen setting)
    #[serde(default)]
    pub jobs: Option<u32>,
}

impl BuildSection {
    /// Build phases in execution order
    pub fn steps(&self) -> Vec<(&'static str, &str)> {
        [
            ("configure", &self.configure),
            ("make", &self.make),
            ("install", &self.install),
        ]
        .into_iter()
        .filter_map(|(phase, cmd)| cmd.as_deref().map(|c| (phase, c)))
        .collect()
    }
}

/// A copy rule placing files into the package directory
///
/// `pattern` is a glob matched against paths relative to the origin
/// directory (plus `src`). `*` also matches `/`, so `samv71b/*` takes the
/// whole tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyRule {
    pub pattern: String,

    /// Where files come from
    #[serde(default)]
    pub from: CopyOrigin,

    /// Sub directory of the origin to match within
    #[serde(default)]
    pub src: Option<String>,

    /// Destination relative to the package directory
    ///
    /// Supports `%(variable)s` substitution.
    #[serde(default)]
    pub dst: String,

    /// Keep the matched relative path below `dst` (otherwise flatten)
    #[serde(default = "default_keep_path")]
    pub keep_path: bool,
}

fn default_keep_path() -> bool {
    true
}

/// Origin directory of a copy rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CopyOrigin {
    /// The recipe's own source tree
    #[default]
    Source,
    /// The package directory of a named dependency (`dep:<name>`)
    Dependency(String),
}

impl TryFrom<String> for CopyOrigin {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        if s == "source" {
            return Ok(CopyOrigin::Source);
        }
        match s.strip_prefix("dep:") {
            Some(name) if !name.is_empty() => Ok(CopyOrigin::Dependency(name.to_string())),
            _ => Err(Error::ParseError(format!(
                "Invalid copy origin '{}', expected 'source' or 'dep:<name>'",
                s
            ))),
        }
    }
}

impl From<CopyOrigin> for String {
    fn from(origin: CopyOrigin) -> Self {
        match origin {
            CopyOrigin::Source => "source".to_string(),
            CopyOrigin::Dependency(name) => format!("dep:{}", name),
        }
    }
}
