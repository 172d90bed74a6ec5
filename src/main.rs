// src/main.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    // Logs go to stderr so generated files on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List) => commands::cmd_list(),

        Some(Commands::Show { recipe, json }) => commands::cmd_show(&recipe, json),

        Some(Commands::Validate { recipe }) => commands::cmd_validate(&recipe),

        Some(Commands::Header {
            recipe,
            options,
            output,
        }) => commands::cmd_header(&recipe, &options, output.as_deref()),

        Some(Commands::Startup { recipe, output }) => {
            commands::cmd_startup(&recipe, output.as_deref())
        }

        Some(Commands::Cook {
            recipe,
            source,
            package,
            options,
            deps,
            jobs,
            build_type,
            no_build,
        }) => commands::cmd_cook(
            &recipe,
            &source,
            &package,
            &options,
            &deps,
            jobs,
            &build_type,
            no_build,
        ),

        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
