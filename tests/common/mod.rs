// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write a file below `root`, creating parent directories.
pub fn touch(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Create an unpacked FreeRTOS kernel tree with the files the recipe lays out.
///
/// Returns the TempDir - keep it alive to prevent cleanup.
pub fn freertos_source() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "include/FreeRTOS.h", "/* kernel */\n");
    touch(root, "include/task.h", "/* tasks */\n");
    touch(root, "portable/GCC/ARM_CM7/r0p1/portmacro.h", "/* port */\n");
    touch(root, "portable/GCC/ARM_CM4F/portmacro.h", "/* other port */\n");
    touch(root, "tasks.c", "/* tasks */\n");
    dir
}

/// Create an unpacked SAMV71 device pack with two startup models.
pub fn samv71_source() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    touch(root, "samv71b/include/samv71.h", "/* family */\n");
    touch(root, "samv71b/include/component/pio.h", "/* pio */\n");
    for model in ["samv71q21b", "samv71j19b"] {
        touch(root, &format!("samv71b/gcc/gcc/startup_{}.c", model), "/* startup */\n");
        touch(root, &format!("samv71b/gcc/gcc/{}_flash.ld", model), "/* flash */\n");
        touch(root, &format!("samv71b/gcc/gcc/{}_sram.ld", model), "/* sram */\n");
    }
    touch(root, "Microchip.SAMV71_DFP.pdsc", "<package/>\n");
    touch(root, "package.content", "content\n");
    dir
}

/// Create a cooked CMSIS package directory.
pub fn cmsis_package() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "CMSIS/Core/Include/core_cm7.h", "/* core */\n");
    touch(dir.path(), "ARM.CMSIS.pdsc", "<package/>\n");
    dir
}
