//! Command-line interface for bulmaform.
//!
//! This module provides the CLI structure and command handlers for the
//! `bulmaform` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ConfigCommand, RenderCommand, SimulateCommand};

/// bulmaform - Bulma form markup with dynamic nested rows
///
/// Renders form blueprints to HTML, including the row templates used to add
/// nested records in the browser, and simulates row clicks offline.
#[derive(Debug, Parser)]
#[command(name = "bulmaform")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Render a form blueprint to HTML
    Render(RenderCommand),

    /// Render a blueprint and click its row buttons in memory
    Simulate(SimulateCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
