//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Kiosk Export using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Kiosk Export - Embark museum metadata harvester
#[derive(Parser, Debug)]
#[command(name = "kiosk-export")]
#[command(version, about, long_about = None)]
#[command(author = "Kiosk Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "kiosk.toml", env = "KIOSK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "KIOSK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, split, validate and distribute Embark metadata
    Harvest(commands::harvest::HarvestArgs),

    /// Split and validate a local composite file without distributing it
    Check(commands::check::CheckArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
