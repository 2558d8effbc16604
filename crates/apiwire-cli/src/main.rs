//! apiwire - CLI tool for exploring JSON APIs.
//!
//! This is a thin wrapper over the `apiwire` library: every request goes
//! through a `ServiceClient` built from flags, environment and an optional
//! saved configuration.

mod cli;
mod commands;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.json_logs);

    match cli.command {
        Commands::Get(args) => commands::request::get(&cli.global, args).await,
        Commands::Delete(args) => commands::request::delete(&cli.global, args).await,
        Commands::Post(args) => commands::request::post(&cli.global, args).await,
        Commands::Put(args) => commands::request::put(&cli.global, args).await,
        Commands::Config(args) => commands::config::run(&cli.global, args),
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
