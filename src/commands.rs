//! CLI command definitions
//!
//! Defines the clap commands for the scenario runner CLI.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::common::config::BrowserKind;

#[derive(Subcommand)]
pub enum Commands {
    /// Run scenario suites (the built-in navigation suite when no path is given)
    Run {
        /// YAML suite files or directories containing them
        paths: Vec<PathBuf>,

        #[command(flatten)]
        driver: DriverArgs,

        /// Show the browser window instead of running headless
        #[arg(long)]
        headed: bool,

        /// Only run scenarios whose name contains this text
        #[arg(long, short)]
        filter: Option<String>,

        /// Print results as JSON instead of console output
        #[arg(long)]
        json: bool,

        /// Verbose output (every step, debug logging)
        #[arg(long, short)]
        verbose: bool,
    },

    /// List scenarios without running them
    List {
        /// YAML suite files or directories containing them
        paths: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that a WebDriver endpoint is reachable and ready
    Check {
        #[command(flatten)]
        driver: DriverArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Options selecting the WebDriver endpoint
#[derive(Args, Debug, Default)]
pub struct DriverArgs {
    /// Remote WebDriver URL (skips spawning a local driver)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Browser to drive
    #[arg(long, value_enum)]
    pub browser: Option<BrowserKind>,
}
