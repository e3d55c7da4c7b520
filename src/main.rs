// Kiosk Export - Embark museum metadata harvester
// Copyright (c) 2025 Kiosk Export Contributors
// Licensed under the MIT License

use clap::Parser;
use kiosk_export::cli::{Cli, Commands};
use kiosk_export::config::{load_config, LoggingConfig};
use kiosk_export::logging::init_logging;
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Kiosk Export - Embark museum metadata harvester"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // Flush the file appender before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Log level and sinks for this invocation
///
/// Only `harvest` writes log files; the other commands log to the console.
/// A configuration that fails to load here is reported by the command itself.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let console_only = LoggingConfig {
        local_enabled: false,
        ..Default::default()
    };

    let (level, logging) = match &cli.command {
        Commands::Harvest(_) => match load_config(&cli.config) {
            Ok(config) => (config.application.log_level, config.logging),
            Err(_) => ("info".to_string(), console_only),
        },
        _ => ("info".to_string(), console_only),
    };

    (cli.log_level.clone().unwrap_or(level), logging)
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Harvest(args) => args.execute(&cli.config).await,
        Commands::Check(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
