mod cli;
mod color;
mod commands;
mod config;
mod context;
mod markdown;
mod output;
mod render;
mod terminal;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use output::output_error;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    color::init(cli.color);
    setup_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        output_error(&e, cli.format);
        return ExitCode::from(1);
    }

    ExitCode::SUCCESS
}

/// Diagnostics go to stderr so stdout stays clean for the report.
/// `RUST_LOG` wins over `-v` when set.
fn setup_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Completions { shell } = &cli.command {
        Cli::generate_completions(*shell);
        return Ok(());
    }

    let mut config = Config::load(cli.config.clone())?;
    config.merge_with_cli(cli.repo.clone(), cli.token.clone(), cli.api_url.clone());

    match &cli.command {
        Commands::Pr { action } => {
            config.validate()?;
            commands::pr::handle_pr(&config, action, cli.format)
        }
        Commands::Config { action } => {
            commands::config::handle_config(&config, cli.config.as_deref(), action, cli.format)
        }
        Commands::Completions { .. } => Ok(()),
    }
}
