// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: recipe name or path
fn recipe_arg() -> Arg {
    Arg::new("recipe")
        .required(true)
        .help("Catalog name or path to a recipe file")
}

/// Common argument: option override
fn option_arg() -> Arg {
    Arg::new("option")
        .short('o')
        .long("option")
        .value_name("NAME=VALUE")
        .action(ArgAction::Append)
        .help("Option override (repeatable)")
}

/// Common argument: output file
fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .value_name("PATH")
        .help("Write to a file instead of stdout")
}

fn build_cli() -> Command {
    Command::new("pantry")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Pantry Contributors")
        .about("Recipes and generators for embedded firmware SDKs")
        .subcommand_required(false)
        .subcommand(Command::new("list").about("List the recipes in the built-in catalog"))
        .subcommand(
            Command::new("show")
                .about("Show a recipe's metadata and declared options")
                .arg(recipe_arg())
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the recipe as JSON"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a recipe")
                .arg(recipe_arg()),
        )
        .subcommand(
            Command::new("header")
                .about("Render the configuration header of a recipe")
                .arg(recipe_arg())
                .arg(option_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("startup")
                .about("Render the startup CMake project of a device pack recipe")
                .arg(recipe_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("cook")
                .about("Cook a recipe from an unpacked source tree into a package directory")
                .arg(recipe_arg())
                .arg(
                    Arg::new("source")
                        .long("source")
                        .value_name("DIR")
                        .required(true)
                        .help("Unpacked upstream sources"),
                )
                .arg(
                    Arg::new("package")
                        .long("package")
                        .value_name("DIR")
                        .required(true)
                        .help("Package directory to assemble"),
                )
                .arg(option_arg())
                .arg(
                    Arg::new("dep")
                        .long("dep")
                        .value_name("NAME=DIR")
                        .action(ArgAction::Append)
                        .help("Package directory of a cooked dependency (repeatable)"),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel build jobs (default: available CPUs)"),
                )
                .arg(
                    Arg::new("build_type")
                        .long("build-type")
                        .default_value("Release")
                        .help("Value of %(build_type)s"),
                )
                .arg(
                    Arg::new("no_build")
                        .long("no-build")
                        .action(ArgAction::SetTrue)
                        .help("Only generate files and assemble the package, skip the native build"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pantry.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
