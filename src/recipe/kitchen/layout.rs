// src/recipe/kitchen/layout.rs

//! Copy rules: assembling the package directory from matched files

use crate::error::{Error, Result};
use crate::recipe::format::CopyRule;
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// `*` crosses directory separators, so `arch/*` takes a whole tree
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Copy every file under `origin` (plus the rule's `src`) matching the rule
///
/// `dst` is the already-substituted destination below `package_dir`.
/// Returns the number of files copied. A missing origin directory copies
/// nothing.
pub fn apply_rule(rule: &CopyRule, origin: &Path, package_dir: &Path, dst: &str) -> Result<usize> {
    let base = match &rule.src {
        Some(src) => origin.join(src),
        None => origin.to_path_buf(),
    };

    if !base.is_dir() {
        debug!("Copy origin {} does not exist, skipping", base.display());
        return Ok(0);
    }

    let pattern = Pattern::new(&rule.pattern).map_err(|e| {
        Error::ParseError(format!("Invalid layout pattern '{}': {}", rule.pattern, e))
    })?;
    let target_root = package_dir.join(dst);

    let mut copied = 0;
    for entry in WalkDir::new(&base).sort_by_file_name() {
        let entry = entry
            .map_err(|e| Error::IoError(format!("Failed to walk {}: {}", base.display(), e)))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let rel = match entry.path().strip_prefix(&base) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        if !pattern.matches_path_with(rel, MATCH_OPTIONS) {
            continue;
        }

        let target = if rule.keep_path {
            target_root.join(rel)
        } else {
            target_root.join(entry.file_name())
        };
        copy_file(entry.path(), &target)?;
        copied += 1;
    }

    debug!(
        "Copied {} file(s) matching {} into {}",
        copied,
        rule.pattern,
        target_root.display()
    );
    Ok(copied)
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            Error::IoError(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::copy(from, to).map_err(|e| {
        Error::IoError(format!(
            "Failed to copy {} to {}: {}",
            from.display(),
            to.display(),
            e
        ))
    })?;
    Ok(())
}
