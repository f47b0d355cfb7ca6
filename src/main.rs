//! webscenario - browser scenario runner
//!
//! Runs YAML-defined or built-in browser scenarios through a WebDriver
//! endpoint and reports pass / fail / error per scenario.

use std::path::PathBuf;

use clap::Parser;
use commands::Commands;
use webscenario::common::config::Config;
use webscenario::common::logging;
use webscenario::{cli, commands};

#[derive(Parser)]
#[command(name = "webscenario", about = "Browser scenario runner over WebDriver")]
#[command(version, long_about = None)]
struct Cli {
    /// Config file (default: platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let verbose = matches!(cli.command, Commands::Run { verbose: true, .. });
    let log_guard = logging::init_cli(verbose, config.logging.file);
    if let Some(path) = &log_guard.log_path {
        tracing::debug!("Logging to {}", path.display());
    }

    if let Err(e) = cli::dispatch(cli.command, config).await {
        eprintln!("Error: {e}");
        // Flush the file log before exiting
        drop(log_guard);
        std::process::exit(1);
    }
}
