//! CLI command handling
//!
//! Resolves the WebDriver endpoint, runs suites and formats output.

use colored::Colorize;

use crate::commands::{Commands, DriverArgs};
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::testing::{self, builtin, report, RunOptions, Suite, SuiteReport};
use crate::webdriver;

/// Dispatch a CLI command
pub async fn dispatch(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Run {
            paths,
            driver,
            headed,
            filter,
            json,
            verbose,
        } => {
            let suites = load_suites(&paths)?;
            apply_driver_args(&mut config, &driver);
            if headed {
                config.webdriver.headless = false;
            }

            let options = RunOptions {
                filter,
                verbose,
                print: !json,
            };

            let reports = run_suites(&config, &suites, &options).await?;

            if json {
                report::print_json(&reports)?;
            } else {
                report::print_summary(&reports);
            }

            let failed: usize = reports.iter().map(|r| r.failed).sum();
            let errored: usize = reports.iter().map(|r| r.errored).sum();
            if failed > 0 || errored > 0 {
                return Err(Error::ScenariosFailed { failed, errored });
            }
            Ok(())
        }

        Commands::List { paths, json } => {
            let suites = load_suites(&paths)?;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report::listing_json(&suites))?
                );
            } else {
                report::print_listing(&suites);
            }
            Ok(())
        }

        Commands::Check { driver, json } => {
            apply_driver_args(&mut config, &driver);

            // Report readiness as-is; a busy endpoint is not an error here
            let endpoint = webdriver::connect(&config).await?;
            let status = endpoint.client().status().await;
            let url = endpoint.client().base_url().to_string();
            let managed = endpoint.is_managed();
            endpoint.shutdown().await;
            let status = status?;

            if json {
                let value = serde_json::json!({
                    "url": url,
                    "managed": managed,
                    "ready": status.ready,
                    "message": status.message,
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let kind = if managed { "managed" } else { "remote" };
                let state = if status.ready {
                    "ready".green()
                } else {
                    "not ready".red()
                };
                println!("WebDriver at {} ({}): {}", url, kind, state);
                if !status.message.is_empty() {
                    println!("  {}", status.message.dimmed());
                }
            }
            Ok(())
        }
    }
}

/// Suites from the given paths, or the built-in suite when none are given
fn load_suites(paths: &[std::path::PathBuf]) -> Result<Vec<Suite>> {
    if paths.is_empty() {
        Ok(vec![builtin::navigation_suite()])
    } else {
        testing::load_paths(paths)
    }
}

fn apply_driver_args(config: &mut Config, args: &DriverArgs) {
    if let Some(url) = &args.webdriver_url {
        config.webdriver.url = Some(url.clone());
    }
    if let Some(browser) = args.browser {
        config.webdriver.browser = browser;
    }
}

/// Open one browser session and run every suite on it
async fn run_suites(
    config: &Config,
    suites: &[Suite],
    options: &RunOptions,
) -> Result<Vec<SuiteReport>> {
    let endpoint = webdriver::ensure_driver(config).await?;

    let session = match endpoint
        .client()
        .new_session(&config.webdriver, &config.timeouts)
        .await
    {
        Ok(session) => session,
        Err(e) => {
            endpoint.shutdown().await;
            return Err(e);
        }
    };

    let mut reports = Vec::with_capacity(suites.len());
    for suite in suites {
        reports.push(testing::run_suite(&session, suite, options).await);
    }

    if let Err(e) = session.close().await {
        tracing::warn!("Failed to close browser session: {}", e);
    }
    endpoint.shutdown().await;

    Ok(reports)
}
