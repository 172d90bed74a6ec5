// src/recipe/options.rs

//! Recipe options: values, declarations, and override resolution
//!
//! Options live in two namespaces. `[options.build]` configures the build
//! system itself (which heap implementation to compile, which port to use)
//! and only feeds command substitution. `[options.config]` configures the
//! target program and becomes the generated configuration header.
//!
//! ```toml
//! [options.build]
//! heap = { default = "4", choices = ["1", "2", "3", "4", "5"] }
//!
//! [options.config]
//! configUSE_PREEMPTION = true
//! configTICK_RATE_HZ = 100
//! configSTACK_DEPTH_TYPE = "size_t"
//! ```

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// A single option value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl OptionValue {
    /// Integer view of the value
    ///
    /// Strings count when they hold a decimal or `0x`-prefixed literal.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            OptionValue::Int(v) => Some(*v),
            OptionValue::Str(s) => parse_integer(s),
            OptionValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(v) => write!(f, "{}", v),
            OptionValue::Str(s) => f.write_str(s),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal integer
pub fn parse_integer(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };

    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        i64::from_str_radix(hex, 16).ok()?
    } else {
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Check that `name` is usable as a C preprocessor identifier
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_open(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::invalid(format!("Option {} cannot be empty", name)));
    }
    if value.contains(['\n', '\r']) {
        return Err(Error::invalid(format!(
            "Option {} contains a line break",
            name
        )));
    }
    Ok(())
}

/// The legal values of a declared option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    /// Any integer
    Int,
    /// One of a fixed set of strings
    Choice(Vec<String>),
    /// Any non-empty single-line string
    Open,
}

impl OptionKind {
    /// Parse a raw command-line value for an option of this kind
    pub fn parse_value(&self, name: &str, raw: &str) -> Result<OptionValue> {
        match self {
            OptionKind::Bool => parse_bool(raw).map(OptionValue::Bool).ok_or_else(|| {
                Error::invalid(format!("Option {} expects a boolean, got '{}'", name, raw))
            }),
            OptionKind::Int => parse_integer(raw).map(OptionValue::Int).ok_or_else(|| {
                Error::invalid(format!("Option {} expects an integer, got '{}'", name, raw))
            }),
            OptionKind::Choice(choices) => {
                if choices.iter().any(|c| c == raw) {
                    Ok(OptionValue::Str(raw.to_string()))
                } else {
                    Err(Error::invalid(format!(
                        "Option {} must be one of [{}], got '{}'",
                        name,
                        choices.join(", "),
                        raw
                    )))
                }
            }
            OptionKind::Open => {
                check_open(name, raw)?;
                Ok(OptionValue::Str(raw.to_string()))
            }
        }
    }

    /// Check an already-typed value against this kind
    pub fn check(&self, name: &str, value: &OptionValue) -> Result<()> {
        match (self, value) {
            (OptionKind::Bool, OptionValue::Bool(_)) => Ok(()),
            (OptionKind::Int, OptionValue::Int(_)) => Ok(()),
            (OptionKind::Choice(choices), OptionValue::Str(s)) if choices.contains(s) => Ok(()),
            (OptionKind::Open, OptionValue::Str(s)) => check_open(name, s),
            _ => Err(Error::invalid(format!(
                "Value '{}' is not valid for option {} ({})",
                value, name, self
            ))),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionKind::Bool => f.write_str("bool"),
            OptionKind::Int => f.write_str("int"),
            OptionKind::Choice(choices) => write!(f, "one of [{}]", choices.join(", ")),
            OptionKind::Open => f.write_str("string"),
        }
    }
}

/// An option declaration in a recipe
///
/// A plain value declares a bool, int, or open string option with that
/// default. A table with `choices` declares a string enum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionDecl {
    Choice { default: String, choices: Vec<String> },
    Plain(OptionValue),
}

impl OptionDecl {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionDecl::Choice { choices, .. } => OptionKind::Choice(choices.clone()),
            OptionDecl::Plain(OptionValue::Bool(_)) => OptionKind::Bool,
            OptionDecl::Plain(OptionValue::Int(_)) => OptionKind::Int,
            OptionDecl::Plain(OptionValue::Str(_)) => OptionKind::Open,
        }
    }

    pub fn default_value(&self) -> OptionValue {
        match self {
            OptionDecl::Choice { default, .. } => OptionValue::Str(default.clone()),
            OptionDecl::Plain(value) => value.clone(),
        }
    }

    /// Check the declaration is self-consistent
    pub fn validate(&self, name: &str) -> Result<()> {
        if matches!(self, OptionDecl::Choice { choices, .. } if choices.is_empty()) {
            return Err(Error::invalid(format!(
                "Option {} declares an empty choice list",
                name
            )));
        }
        self.kind().check(name, &self.default_value())
    }
}

/// Which namespace an option is declared in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Build,
    Config,
}

impl Namespace {
    pub fn as_str(&self) -> &'static str {
        match self {
            Namespace::Build => "build",
            Namespace::Config => "config",
        }
    }
}

/// An insertion-ordered table of option values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionTable {
    entries: IndexMap<String, OptionValue>,
}

impl OptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value
    ///
    /// Replacing keeps the option's original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Option<OptionValue> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, OptionValue> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|k| k.as_str())
    }
}

impl<S: Into<String>, V: Into<OptionValue>> FromIterator<(S, V)> for OptionTable {
    fn from_iter<I: IntoIterator<Item = (S, V)>>(iter: I) -> Self {
        let mut table = OptionTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

impl<'a> IntoIterator for &'a OptionTable {
    type Item = (&'a String, &'a OptionValue);
    type IntoIter = indexmap::map::Iter<'a, String, OptionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// A `NAME=VALUE` override supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionOverride {
    pub name: String,
    pub value: String,
}

impl FromStr for OptionOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, value) = s.split_once('=').ok_or_else(|| {
            Error::invalid(format!("Option override '{}' must look like NAME=VALUE", s))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid(format!(
                "Option override '{}' has an empty name",
                s
            )));
        }
        Ok(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
        })
    }
}

/// Option values after defaults and overrides are applied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedOptions {
    /// Build-system options, used only for substitution
    pub build: OptionTable,
    /// Target-program options, rendered into the configuration header
    pub config: OptionTable,
}

/// The `[options]` section of a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OptionsSection {
    #[serde(default)]
    pub build: IndexMap<String, OptionDecl>,

    #[serde(default)]
    pub config: IndexMap<String, OptionDecl>,
}

impl OptionsSection {
    pub fn is_empty(&self) -> bool {
        self.build.is_empty() && self.config.is_empty()
    }

    /// Look up a declaration in either namespace
    pub fn decl(&self, name: &str) -> Option<(Namespace, &OptionDecl)> {
        self.build
            .get(name)
            .map(|d| (Namespace::Build, d))
            .or_else(|| self.config.get(name).map(|d| (Namespace::Config, d)))
    }

    /// Check every declaration and the namespace split
    pub fn validate(&self) -> Result<()> {
        for (name, decl) in &self.build {
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '=') {
                return Err(Error::invalid(format!(
                    "Invalid build option name: '{}'",
                    name
                )));
            }
            decl.validate(name)?;
        }

        for (name, decl) in &self.config {
            if !is_identifier(name) {
                return Err(Error::invalid(format!(
                    "Config option '{}' is not a valid C identifier",
                    name
                )));
            }
            if self.build.contains_key(name) {
                return Err(Error::invalid(format!(
                    "Option {} is declared as both a build and a config option",
                    name
                )));
            }
            decl.validate(name)?;
        }

        Ok(())
    }

    /// Default values of every declared option, in declaration order
    pub fn defaults(&self) -> ResolvedOptions {
        ResolvedOptions {
            build: self
                .build
                .iter()
                .map(|(name, decl)| (name.clone(), decl.default_value()))
                .collect(),
            config: self
                .config
                .iter()
                .map(|(name, decl)| (name.clone(), decl.default_value()))
                .collect(),
        }
    }

    /// Apply overrides on top of the declared defaults
    ///
    /// Overrides are applied in order, so the last one for a name wins.
    pub fn resolve(&self, overrides: &[OptionOverride]) -> Result<ResolvedOptions> {
        let mut resolved = self.defaults();

        for ov in overrides {
            let (namespace, decl) = self
                .decl(&ov.name)
                .ok_or_else(|| Error::invalid(format!("Unknown option: {}", ov.name)))?;

            let value = decl.kind().parse_value(&ov.name, &ov.value)?;
            debug!("Override {} option {} = {}", namespace.as_str(), ov.name, value);

            match namespace {
                Namespace::Build => resolved.build.insert(ov.name.clone(), value),
                Namespace::Config => resolved.config.insert(ov.name.clone(), value),
            };
        }

        Ok(resolved)
    }
}
