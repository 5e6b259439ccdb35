//! Prism — apply, convert and blend 3D color LUTs from the command line.
//!
//! Logs go to stderr (`RUST_LOG`, default `info`) so `blend` and `info`
//! can write results to stdout.

mod cli;
mod commands;
mod config;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::default();
    config.init_thread_pool();

    let result = match cli.command {
        Commands::Apply(args) => commands::apply(args, &config),
        Commands::Convert(args) => commands::convert(args, &config),
        Commands::Blend(args) => commands::blend(args),
        Commands::Info(args) => commands::info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
