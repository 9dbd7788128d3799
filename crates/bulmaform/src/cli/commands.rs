//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Render command arguments.
#[derive(Debug, Args)]
pub struct RenderCommand {
    /// Form blueprint (JSON)
    pub file: PathBuf,

    /// Write the HTML here instead of stdout
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,
}

/// Simulate command arguments.
#[derive(Debug, Args)]
pub struct SimulateCommand {
    /// Form blueprint (JSON)
    pub file: PathBuf,

    /// Top-level association whose rows are clicked
    #[arg(short, long)]
    pub association: String,

    /// Click the add button this many times
    #[arg(long, default_value = "0")]
    pub add: usize,

    /// Click the delete button of the row at this index
    #[arg(long, value_name = "INDEX")]
    pub mark: Option<String>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
