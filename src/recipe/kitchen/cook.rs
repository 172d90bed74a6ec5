// src/recipe/kitchen/cook.rs

//! Cook: the actual build execution for a single recipe

use crate::error::{Error, Result};
use crate::recipe::format::{CopyOrigin, Recipe};
use crate::recipe::info::PackageInfo;
use crate::recipe::options::ResolvedOptions;
use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use super::layout::apply_rule;
use super::{absolute, CookResult, Kitchen};

/// A single cook operation
pub struct Cook<'a> {
    pub(super) kitchen: &'a Kitchen,
    pub(super) recipe: &'a Recipe,
    pub(super) options: &'a ResolvedOptions,
    /// Unpacked upstream sources
    pub(super) source_dir: PathBuf,
    /// Package directory being assembled (also `DESTDIR`)
    pub(super) package_dir: PathBuf,
    /// Variables for `%(name)s` substitution
    pub(super) context: IndexMap<String, String>,
    /// Files generated into the source tree
    pub(super) generated: Vec<PathBuf>,
    /// Build log accumulator
    pub(super) log: String,
    /// Warnings
    pub(super) warnings: Vec<String>,
}

impl<'a> Cook<'a> {
    pub(super) fn new(
        kitchen: &'a Kitchen,
        recipe: &'a Recipe,
        options: &'a ResolvedOptions,
        source_dir: &Path,
        package_dir: &Path,
    ) -> Result<Self> {
        if !source_dir.is_dir() {
            return Err(Error::NotFound(format!(
                "Source directory not found: {}",
                source_dir.display()
            )));
        }

        fs::create_dir_all(package_dir).map_err(|e| {
            Error::IoError(format!(
                "Failed to create package directory {}: {}",
                package_dir.display(),
                e
            ))
        })?;

        // Build steps run inside the source tree, so every path handed to
        // them must be absolute
        let source_dir = absolute(source_dir)?;
        let package_dir = absolute(package_dir)?;
        let context = kitchen.substitution_context(recipe, options, &source_dir, &package_dir)?;

        Ok(Self {
            kitchen,
            recipe,
            options,
            source_dir,
            package_dir,
            context,
            generated: Vec::new(),
            log: String::new(),
            warnings: Vec::new(),
        })
    }

    /// Phase 1: Prep - generate the configuration header and startup project
    pub(super) fn prep(&mut self) -> Result<()> {
        if let Some(header) = &self.recipe.header {
            let content = self.recipe.render_header(&self.options.config)?;
            let path = self.source_dir.join(&header.path);
            self.write_generated(&path, &content)?;
            self.log_line(&format!("Generated header: {}", header.path));
        }

        if let Some(startup) = &self.recipe.startup {
            let content = self.recipe.render_startup()?;
            let path = self.source_dir.join(&startup.path);
            self.write_generated(&path, &content)?;
            self.log_line(&format!(
                "Generated startup project: {} ({} models)",
                startup.path,
                startup.variants.len()
            ));
        }

        Ok(())
    }

    /// Phase 2: Simmer - run the native build
    pub(super) fn simmer(&mut self) -> Result<()> {
        let build = match &self.recipe.build {
            Some(build) => build,
            None => {
                debug!("Recipe has no build commands");
                return Ok(());
            }
        };

        if !self.kitchen.config.run_build {
            info!("Skipping native build for {}", self.recipe.package.name);
            self.log_line("Native build skipped");
            return Ok(());
        }

        let workdir = match &build.workdir {
            Some(wd) => self.source_dir.join(self.substitute("workdir", wd)?),
            None => self.source_dir.clone(),
        };
        if !workdir.is_dir() {
            fs::create_dir_all(&workdir)?;
        }

        let mut env: Vec<(String, String)> = vec![
            (
                "DESTDIR".to_string(),
                self.package_dir.to_string_lossy().to_string(),
            ),
            (
                "MAKEFLAGS".to_string(),
                format!("-j{}", self.kitchen.jobs_for(self.recipe)),
            ),
        ];
        for (key, value) in &build.environment {
            let value = self.substitute(key, value)?;
            env.push((key.clone(), value));
        }

        for (phase, template) in build.steps() {
            let cmd = self.substitute(phase, template)?;
            self.run_build_step(phase, &cmd, &workdir, &env)?;
        }

        Ok(())
    }

    /// Phase 3: Plate - assemble the package directory and write package info
    pub(super) fn plate(mut self) -> Result<CookResult> {
        let mut copied = 0;

        for rule in &self.recipe.layout {
            let origin = match &rule.from {
                CopyOrigin::Source => self.source_dir.clone(),
                CopyOrigin::Dependency(name) => self
                    .kitchen
                    .config
                    .dependency_dir(name)
                    .map(Path::to_path_buf)
                    .ok_or_else(|| {
                        Error::NotFound(format!(
                            "Dependency {} has no package directory (needed by layout rule {})",
                            name, rule.pattern
                        ))
                    })?,
            };

            let dst = self.substitute("layout", &rule.dst)?;
            let count = apply_rule(rule, &origin, &self.package_dir, &dst)?;
            if count == 0 {
                warn!("Layout rule {} matched no files", rule.pattern);
                self.warnings
                    .push(format!("Layout rule {} matched no files", rule.pattern));
            }
            self.log_line(&format!("Copied {} file(s): {} -> {}", count, rule.pattern, dst));
            copied += count;
        }

        let info_path = PackageInfo::from_recipe(self.recipe, &self.package_dir).write(&self.package_dir)?;
        self.log_line(&format!("Wrote package info: {}", info_path.display()));
        info!(
            "Cooked: {} ({} files)",
            self.package_dir.display(),
            copied
        );

        Ok(CookResult {
            package_dir: self.package_dir,
            generated: self.generated,
            copied,
            info_path,
            log: self.log,
            warnings: self.warnings,
        })
    }

    /// Substitute variables, rejecting anything left unresolved
    fn substitute(&self, what: &str, template: &str) -> Result<String> {
        let result = self.recipe.substitute(template, &self.context);
        if let Some(start) = result.find("%(") {
            let var = result[start..]
                .find(")s")
                .map(|end| &result[start..start + end + 2])
                .unwrap_or(&result[start..]);
            return Err(Error::InvalidConfiguration(format!(
                "Unresolved variable {} in {}: {}",
                var, what, template
            )));
        }
        Ok(result)
    }

    fn write_generated(&mut self, path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
            .map_err(|e| Error::IoError(format!("Failed to write {}: {}", path.display(), e)))?;
        debug!("Wrote {}", path.display());
        self.generated.push(path.to_path_buf());
        Ok(())
    }

    /// Run a build step through the shell
    fn run_build_step(
        &mut self,
        phase: &str,
        command: &str,
        workdir: &Path,
        env: &[(String, String)],
    ) -> Result<()> {
        info!("Running {} phase", phase);
        debug!("Command: {}", command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(workdir)
            .envs(env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| Error::IoError(format!("Failed to run {} phase: {}", phase, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        self.log_build_output(phase, &stdout, &stderr);

        if !output.status.success() {
            return Err(Error::BuildFailed(format!(
                "{} phase failed with exit code {:?}\nstderr: {}",
                phase,
                output.status.code(),
                stderr
            )));
        }

        Ok(())
    }

    fn log_line(&mut self, line: &str) {
        self.log.push_str(line);
        self.log.push('\n');
    }

    /// Log build step output (stdout/stderr) with a phase header
    fn log_build_output(&mut self, phase: &str, stdout: &str, stderr: &str) {
        self.log_line(&format!("=== {} ===", phase));
        if !stdout.is_empty() {
            self.log.push_str(stdout);
            self.log.push('\n');
        }
        if !stderr.is_empty() {
            self.log.push_str(stderr);
            self.log.push('\n');
        }
    }
}
