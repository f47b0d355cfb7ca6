//! Scenario runner
//!
//! Executes registered scenarios against a [`Browser`] strictly in order.
//! The first failing step ends a scenario; a failed scenario never stops the
//! rest of the suite.

use std::time::Instant;

use serde::Serialize;

use crate::browser::Browser;
use crate::common::{Error, Result};

use super::assert::{expect_contains, expect_equal};
use super::config::Step;
use super::registry::{RegisteredScenario, ScenarioBody, Suite};
use super::report;

/// Outcome of a scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Every step completed and every assertion held
    Passed,
    /// An assertion did not hold
    Failed,
    /// The browser or driver could not complete a step
    Errored,
}

/// Result of a single scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    pub status: Status,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
    pub duration_ms: u64,
}

/// Results for one suite
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub name: String,
    pub results: Vec<ScenarioResult>,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Scenarios excluded by the name filter
    pub skipped: usize,
}

impl SuiteReport {
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errored == 0
    }
}

/// Options for a run
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Only run scenarios whose name contains this text
    pub filter: Option<String>,
    /// Print each step as it completes
    pub verbose: bool,
    /// Print progress to stdout (disabled for JSON output)
    pub print: bool,
}

impl RunOptions {
    fn selects(&self, scenario: &RegisteredScenario) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |f| scenario.name.contains(f))
    }
}

/// Run every selected scenario of a suite on the same browser
pub async fn run_suite(browser: &dyn Browser, suite: &Suite, options: &RunOptions) -> SuiteReport {
    if options.print {
        report::print_suite_header(suite);
    }

    let mut results = Vec::new();
    let mut skipped = 0;

    for scenario in suite.scenarios() {
        if !options.selects(scenario) {
            tracing::debug!("Skipping '{}' (filtered)", scenario.name);
            skipped += 1;
            continue;
        }

        let result = run_scenario(browser, scenario, options).await;
        if options.print {
            report::print_scenario_result(&result);
        }
        results.push(result);
    }

    let count = |status: Status| results.iter().filter(|r| r.status == status).count();
    SuiteReport {
        name: suite.name.clone(),
        passed: count(Status::Passed),
        failed: count(Status::Failed),
        errored: count(Status::Errored),
        skipped,
        results,
    }
}

/// Run a single scenario and classify its outcome
pub async fn run_scenario(
    browser: &dyn Browser,
    scenario: &RegisteredScenario,
    options: &RunOptions,
) -> ScenarioResult {
    let started = Instant::now();
    let steps_total = scenario.steps_total();
    tracing::info!("Running scenario '{}'", scenario.name);

    let (steps_run, outcome) = match &scenario.body {
        ScenarioBody::Steps(steps) => run_steps(browser, steps, options).await,
        ScenarioBody::Code(body) => (1, body(browser).await),
    };

    let (status, error) = match outcome {
        Ok(()) => (Status::Passed, None),
        Err(e) => {
            let status = classify(&e);
            tracing::info!("Scenario '{}' {:?}: {}", scenario.name, status, e);
            (status, Some(e.to_string()))
        }
    };

    ScenarioResult {
        name: scenario.name.clone(),
        status,
        steps_run,
        steps_total,
        error,
        duration_ms: started.elapsed().as_millis() as u64,
    }
}

/// Assertion failures fail a scenario; everything else is a harness error
fn classify(error: &Error) -> Status {
    if error.is_assertion() {
        Status::Failed
    } else {
        Status::Errored
    }
}

/// Execute steps in order, stopping at the first error
///
/// Returns the number of steps attempted alongside the outcome.
async fn run_steps(
    browser: &dyn Browser,
    steps: &[Step],
    options: &RunOptions,
) -> (usize, Result<()>) {
    for (i, step) in steps.iter().enumerate() {
        let step_num = i + 1;
        if let Err(e) = execute_step(browser, step).await {
            return (step_num, Err(e));
        }
        if options.print && options.verbose {
            report::print_step_ok(step_num, step);
        }
    }
    (steps.len(), Ok(()))
}

/// Execute a single step
async fn execute_step(browser: &dyn Browser, step: &Step) -> Result<()> {
    match step {
        Step::Navigate { url } => browser.navigate(url).await,
        Step::AssertTitle { equals, contains } => {
            let title = browser.title().await?;
            check("title", &title, equals.as_deref(), contains.as_deref())
        }
        Step::AssertUrl { equals, contains } => {
            let current = browser.current_url().await?;
            check("url", &current, equals.as_deref(), contains.as_deref())
        }
    }
}

fn check(what: &str, actual: &str, equals: Option<&str>, contains: Option<&str>) -> Result<()> {
    if let Some(expected) = equals {
        expect_equal(what, actual, expected)?;
    }
    if let Some(needle) = contains {
        expect_contains(what, actual, needle)?;
    }
    Ok(())
}
