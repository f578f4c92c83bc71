//! Command-line interface for redub
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Offline audio dubbing
#[derive(Parser, Debug)]
#[command(name = "redub", version, about = "Dub a recording into another language, keeping its background")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: stage progress, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dub a recording into the target language
    Dub {
        /// Input WAV file
        input: PathBuf,

        /// Output WAV file
        #[arg(short, long, value_name = "PATH", default_value = "dubbed.wav")]
        output: PathBuf,

        /// Target language code (e.g. hi, de, es). Overrides the config default
        #[arg(short, long, value_name = "LANG")]
        language: Option<String>,
    },

    /// Verify that configured engine commands are available
    Check,

    /// Manage configuration
    Config {
        /// Action to perform
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented starter configuration
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },
    /// Print the active configuration
    Show,
}
