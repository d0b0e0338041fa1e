//! Buildgen CLI - declarative build-file generation and project scaffolding

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("buildgen=debug")
    } else {
        EnvFilter::new("buildgen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::New(args) => commands::new::execute(args),
        Commands::Generate(args) => commands::generate::execute(args),
        Commands::Recipes(args) => commands::recipes::execute(args),
        Commands::Templates(args) => commands::templates::execute(args),
        Commands::Config(args) => commands::config::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
