// src/header.rs

//! Configuration header generator
//!
//! Turns an ordered option table into a block of `#define` lines wrapped in
//! an include guard, for consumption by a C compiler:
//!
//! ```text
//! #ifndef FREERTOS_CONFIG_H
//! #define FREERTOS_CONFIG_H
//! #define configCPU_CLOCK_HZ ( (unsigned long ) 20000000)
//! #define configUSE_PREEMPTION 1
//! #define configTEX_S_C_B_FLASH 0x7UL
//! #endif /* FREERTOS_CONFIG_H */
//! ```
//!
//! Rendering is pure and all-or-nothing: the caller gets either the complete
//! text or an [`Error::InvalidConfiguration`], never a partial header.

use crate::error::{Error, Result};
use crate::recipe::options::{is_identifier, OptionTable, OptionValue};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the assertion macro emitted when `default_assert` is set
pub const ASSERT_MACRO: &str = "configASSERT";

/// Assertion macro definition: disable interrupts and halt on failure
pub const DEFAULT_ASSERT: &str =
    "#define configASSERT( x ) if( ( x ) == 0 ) { taskDISABLE_INTERRUPTS(); for( ;; ); }";

/// Per-option rendering override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatRule {
    /// `( (unsigned long ) <value>)`
    UnsignedLongCast,
    /// Lowercase `0x`-prefixed hexadecimal
    Hex,
    /// Lowercase `0x`-prefixed hexadecimal with a `UL` suffix
    HexUl,
}

impl FormatRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatRule::UnsignedLongCast => "unsigned_long_cast",
            FormatRule::Hex => "hex",
            FormatRule::HexUl => "hex_ul",
        }
    }

    /// Render a non-boolean value under this rule
    pub fn apply(&self, name: &str, value: &OptionValue) -> Result<String> {
        let number = value.as_integer().ok_or_else(|| {
            Error::invalid(format!(
                "Option {} uses the {} rule but '{}' is not an integer",
                name,
                self.as_str(),
                value
            ))
        })?;

        match self {
            FormatRule::UnsignedLongCast => Ok(format!("( (unsigned long ) {})", number)),
            FormatRule::Hex | FormatRule::HexUl if number < 0 => Err(Error::invalid(format!(
                "Option {} uses the {} rule but {} is negative",
                name,
                self.as_str(),
                number
            ))),
            FormatRule::Hex => Ok(format!("{:#x}", number)),
            FormatRule::HexUl => Ok(format!("{:#x}UL", number)),
        }
    }
}

impl fmt::Display for FormatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "unsigned_long_cast" => Ok(FormatRule::UnsignedLongCast),
            "hex" => Ok(FormatRule::Hex),
            "hex_ul" => Ok(FormatRule::HexUl),
            other => Err(Error::invalid(format!("Unknown format rule: {}", other))),
        }
    }
}

/// Everything besides the option values that shapes a rendered header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSpec {
    /// Include guard macro name
    pub guard: String,
    /// Rendering overrides by option name
    pub rules: IndexMap<String, FormatRule>,
    /// Option names left out of the output
    pub exclude: IndexSet<String>,
    /// Append [`DEFAULT_ASSERT`] after the definitions
    pub default_assert: bool,
}

impl HeaderSpec {
    pub fn new(guard: impl Into<String>) -> Self {
        Self {
            guard: guard.into(),
            ..Self::default()
        }
    }

    pub fn with_rule(mut self, name: impl Into<String>, rule: FormatRule) -> Self {
        self.rules.insert(name.into(), rule);
        self
    }

    pub fn with_exclude(mut self, name: impl Into<String>) -> Self {
        self.exclude.insert(name.into());
        self
    }

    pub fn with_default_assert(mut self, enabled: bool) -> Self {
        self.default_assert = enabled;
        self
    }
}

/// Derive an include guard from a header path: `FreeRTOSConfig.h` -> `FREERTOSCONFIG_H`
pub fn guard_for_path(path: &str) -> String {
    let file = path.rsplit(['/', '\\']).next().unwrap_or(path);
    let mut guard: String = file
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    if guard.starts_with(|c: char| c.is_ascii_digit()) {
        guard.insert(0, '_');
    }
    guard
}

fn render_value(name: &str, value: &OptionValue, rule: Option<FormatRule>) -> Result<String> {
    // Booleans ignore any rule
    if let OptionValue::Bool(b) = value {
        return Ok(if *b { "1" } else { "0" }.to_string());
    }

    let rendered = match rule {
        Some(rule) => rule.apply(name, value)?,
        None => value.to_string(),
    };

    if rendered.contains(['\n', '\r']) {
        return Err(Error::invalid(format!(
            "Option {} contains a line break",
            name
        )));
    }

    Ok(rendered)
}

/// Render the configuration header for `options`
pub fn render(options: &OptionTable, spec: &HeaderSpec) -> Result<String> {
    if !is_identifier(&spec.guard) {
        return Err(Error::invalid(format!(
            "Header guard '{}' is not a valid C identifier",
            spec.guard
        )));
    }

    let mut lines = Vec::with_capacity(options.len() + 4);
    lines.push(format!("#ifndef {}", spec.guard));
    lines.push(format!("#define {}", spec.guard));

    for (name, value) in options {
        if spec.exclude.contains(name) {
            continue;
        }
        if !is_identifier(name) {
            return Err(Error::invalid(format!(
                "Option name '{}' is not a valid C identifier",
                name
            )));
        }
        if spec.default_assert && name == ASSERT_MACRO {
            return Err(Error::invalid(format!(
                "Option {} collides with the default assertion macro",
                name
            )));
        }

        let rendered = render_value(name, value, spec.rules.get(name).copied())?;
        lines.push(format!("#define {} {}", name, rendered));
    }

    if spec.default_assert {
        lines.push(DEFAULT_ASSERT.to_string());
    }
    lines.push(format!("#endif /* {} */", spec.guard));

    let mut text = lines.join("\n");
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definitions(text: &str, guard: &str) -> Vec<String> {
        let guard_define = format!("#define {}", guard);
        text.lines()
            .filter(|l| l.starts_with("#define ") && *l != guard_define && *l != DEFAULT_ASSERT)
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_default_rendering() {
        let options: OptionTable = [
            ("configUSE_PREEMPTION", OptionValue::Bool(true)),
            ("configUSE_IDLE_HOOK", OptionValue::Bool(false)),
            ("configTICK_RATE_HZ", OptionValue::Int(100)),
            ("configSTACK_DEPTH_TYPE", OptionValue::from("size_t")),
        ]
        .into_iter()
        .collect();

        let text = render(&options, &HeaderSpec::new("CONFIG_H")).unwrap();
        assert_eq!(
            text,
            "#ifndef CONFIG_H\n\
             #define CONFIG_H\n\
             #define configUSE_PREEMPTION 1\n\
             #define configUSE_IDLE_HOOK 0\n\
             #define configTICK_RATE_HZ 100\n\
             #define configSTACK_DEPTH_TYPE size_t\n\
             #endif /* CONFIG_H */\n"
        );
    }

    #[test]
    fn test_one_line_per_option_in_order() {
        let options: OptionTable = (0..50)
            .map(|i| (format!("OPT_{}", 49 - i), OptionValue::Int(i)))
            .collect();

        let text = render(&options, &HeaderSpec::new("G")).unwrap();
        let defs = definitions(&text, "G");
        assert_eq!(defs.len(), 50);
        for (line, (name, value)) in defs.iter().zip(options.iter()) {
            assert_eq!(line, &format!("#define {} {}", name, value));
        }
    }

    #[test]
    fn test_rules() {
        assert_eq!(FormatRule::Hex.apply("A", &OptionValue::Int(7)).unwrap(), "0x7");
        assert_eq!(FormatRule::HexUl.apply("A", &OptionValue::Int(7)).unwrap(), "0x7UL");
        assert_eq!(
            FormatRule::UnsignedLongCast
                .apply("A", &OptionValue::Int(20_000_000))
                .unwrap(),
            "( (unsigned long ) 20000000)"
        );
        assert_eq!(FormatRule::Hex.apply("A", &OptionValue::Int(0xFFFF)).unwrap(), "0xffff");
        // Numeric strings are accepted
        assert_eq!(FormatRule::HexUl.apply("A", &OptionValue::from("0x07")).unwrap(), "0x7UL");
        assert_eq!(FormatRule::Hex.apply("A", &OptionValue::from("255")).unwrap(), "0xff");
    }

    #[test]
    fn test_booleans_ignore_rules() {
        let options: OptionTable = [("configENABLE_MPU", true), ("configENABLE_FPU", false)]
            .into_iter()
            .collect();
        let spec = HeaderSpec::new("G")
            .with_rule("configENABLE_MPU", FormatRule::HexUl)
            .with_rule("configENABLE_FPU", FormatRule::UnsignedLongCast);

        let text = render(&options, &spec).unwrap();
        assert!(text.contains("#define configENABLE_MPU 1\n"));
        assert!(text.contains("#define configENABLE_FPU 0\n"));
    }

    #[test]
    fn test_non_numeric_hex_fails_without_output() {
        let options: OptionTable = [
            ("configTICK_RATE_HZ", OptionValue::Int(100)),
            ("configTEX_S_C_B_FLASH", OptionValue::from("seven")),
        ]
        .into_iter()
        .collect();
        let spec = HeaderSpec::new("G").with_rule("configTEX_S_C_B_FLASH", FormatRule::Hex);

        let result = render(&options, &spec);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_negative_hex_fails() {
        let options: OptionTable = [("MASK", -1i64)].into_iter().collect();
        let spec = HeaderSpec::new("G").with_rule("MASK", FormatRule::Hex);
        assert!(render(&options, &spec).is_err());

        // A cast of a negative value is still valid C
        let spec = HeaderSpec::new("G").with_rule("MASK", FormatRule::UnsignedLongCast);
        assert!(render(&options, &spec).unwrap().contains("( (unsigned long ) -1)"));
    }

    #[test]
    fn test_exclusion() {
        let options: OptionTable = [
            ("heap", OptionValue::from("heap_4")),
            ("configUSE_TIMERS", OptionValue::Bool(true)),
            ("port", OptionValue::from("GCC_ARM_CM7")),
        ]
        .into_iter()
        .collect();
        let spec = HeaderSpec::new("G").with_exclude("heap").with_exclude("port");

        let text = render(&options, &spec).unwrap();
        assert!(!text.contains("heap"));
        assert!(!text.contains("port"));
        assert_eq!(definitions(&text, "G"), vec!["#define configUSE_TIMERS 1"]);
    }

    #[test]
    fn test_default_assert_placement() {
        let options: OptionTable = [("configUSE_MUTEXES", true)].into_iter().collect();

        let with = render(&options, &HeaderSpec::new("G").with_default_assert(true)).unwrap();
        let lines: Vec<&str> = with.lines().collect();
        assert_eq!(lines.iter().filter(|l| **l == DEFAULT_ASSERT).count(), 1);
        assert_eq!(lines[lines.len() - 2], DEFAULT_ASSERT);
        assert_eq!(lines[lines.len() - 1], "#endif /* G */");

        let without = render(&options, &HeaderSpec::new("G")).unwrap();
        assert!(!without.contains(ASSERT_MACRO));
    }

    #[test]
    fn test_assert_collision() {
        let options: OptionTable = [("configASSERT", OptionValue::from("( x )"))]
            .into_iter()
            .collect();
        assert!(render(&options, &HeaderSpec::new("G").with_default_assert(true)).is_err());
        assert!(render(&options, &HeaderSpec::new("G")).is_ok());
    }

    #[test]
    fn test_line_break_rejected() {
        let options: OptionTable = [("BAD", OptionValue::from("1\n#define EVIL 1"))]
            .into_iter()
            .collect();
        assert!(render(&options, &HeaderSpec::new("G")).is_err());
    }

    #[test]
    fn test_invalid_guard_and_names() {
        let options: OptionTable = [("OK", 1i64)].into_iter().collect();
        assert!(render(&options, &HeaderSpec::new("NOT A GUARD")).is_err());

        let options: OptionTable = [("not-ok", 1i64)].into_iter().collect();
        assert!(render(&options, &HeaderSpec::new("G")).is_err());
    }

    #[test]
    fn test_idempotent() {
        let options: OptionTable = [
            ("configCPU_CLOCK_HZ", OptionValue::Int(20_000_000)),
            ("configUSE_TIMERS", OptionValue::Bool(true)),
        ]
        .into_iter()
        .collect();
        let spec = HeaderSpec::new("G")
            .with_rule("configCPU_CLOCK_HZ", FormatRule::UnsignedLongCast)
            .with_default_assert(true);

        assert_eq!(render(&options, &spec).unwrap(), render(&options, &spec).unwrap());
    }

    #[test]
    fn test_rule_names() {
        assert_eq!("hex".parse::<FormatRule>().unwrap(), FormatRule::Hex);
        assert_eq!("hex_ul".parse::<FormatRule>().unwrap(), FormatRule::HexUl);
        assert_eq!(
            "unsigned_long_cast".parse::<FormatRule>().unwrap(),
            FormatRule::UnsignedLongCast
        );
        assert!(matches!(
            "octal".parse::<FormatRule>(),
            Err(Error::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_guard_for_path() {
        assert_eq!(guard_for_path("include/FreeRTOSConfig.h"), "FREERTOSCONFIG_H");
        assert_eq!(guard_for_path("config.h"), "CONFIG_H");
        assert_eq!(guard_for_path("1st-config.h"), "_1ST_CONFIG_H");
    }
}
