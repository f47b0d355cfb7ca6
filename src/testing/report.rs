//! Console and JSON reporting

use colored::Colorize;

use crate::common::Result;

use super::config::Step;
use super::registry::{ScenarioBody, Suite};
use super::runner::{ScenarioResult, Status, SuiteReport};

pub fn print_suite_header(suite: &Suite) {
    println!("\n{} {}", "Suite:".blue().bold(), suite.name.white().bold());
    if let Some(desc) = &suite.description {
        println!("  {}", desc.dimmed());
    }
}

pub fn print_step_ok(step_num: usize, step: &Step) {
    println!(
        "    {} Step {}: {}",
        "✓".green(),
        step_num,
        step.describe().dimmed()
    );
}

pub fn print_scenario_result(result: &ScenarioResult) {
    let timing = format!("({} ms)", result.duration_ms);
    match result.status {
        Status::Passed => {
            println!("  {} {} {}", "✓".green(), result.name, timing.dimmed());
        }
        Status::Failed => {
            println!("  {} {} {}", "✗".red(), result.name, timing.dimmed());
            print_failure_detail(result);
        }
        Status::Errored => {
            println!(
                "  {} {} {}",
                "!".yellow().bold(),
                result.name,
                timing.dimmed()
            );
            print_failure_detail(result);
        }
    }
}

fn print_failure_detail(result: &ScenarioResult) {
    let label = match result.status {
        Status::Failed => "FAIL".red().bold(),
        _ => "ERROR".yellow().bold(),
    };
    println!(
        "      {} at step {}/{}: {}",
        label,
        result.steps_run,
        result.steps_total,
        result.error.as_deref().unwrap_or("unknown error")
    );
}

/// Print totals across all suites
pub fn print_summary(reports: &[SuiteReport]) {
    let passed: usize = reports.iter().map(|r| r.passed).sum();
    let failed: usize = reports.iter().map(|r| r.failed).sum();
    let errored: usize = reports.iter().map(|r| r.errored).sum();
    let skipped: usize = reports.iter().map(|r| r.skipped).sum();

    let mut line = format!(
        "{} passed, {} failed, {} errored",
        passed, failed, errored
    );
    if skipped > 0 {
        line.push_str(&format!(", {} skipped", skipped));
    }

    if failed == 0 && errored == 0 {
        println!("\n{} {}\n", "✓".green().bold(), line.green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), line.red().bold());
    }
}

/// Print all suite reports as pretty JSON
pub fn print_json(reports: &[SuiteReport]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(reports)?);
    Ok(())
}

/// Print the scenarios of each suite without running them
pub fn print_listing(suites: &[Suite]) {
    for suite in suites {
        println!("{}", suite.name.bold());
        for scenario in suite.scenarios() {
            match &scenario.body {
                ScenarioBody::Steps(steps) => {
                    println!("  {} ({} steps)", scenario.name, steps.len());
                }
                ScenarioBody::Code(_) => println!("  {} (built-in)", scenario.name),
            }
        }
    }
}

/// JSON form of a listing
pub fn listing_json(suites: &[Suite]) -> serde_json::Value {
    serde_json::Value::Array(
        suites
            .iter()
            .map(|suite| {
                serde_json::json!({
                    "name": suite.name,
                    "description": suite.description,
                    "scenarios": suite
                        .scenarios()
                        .iter()
                        .map(|s| serde_json::json!({ "name": s.name, "steps": s.steps_total() }))
                        .collect::<Vec<_>>(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::builtin;

    #[test]
    fn test_listing_json() {
        let suites = vec![builtin::navigation_suite()];
        let json = listing_json(&suites);
        assert_eq!(json[0]["name"], builtin::SUITE_NAME);
        assert_eq!(json[0]["scenarios"][0]["name"], builtin::SCENARIO_NAME);
        assert_eq!(json[0]["scenarios"][0]["steps"], 1);
    }

    #[test]
    fn test_report_serializes_status_lowercase() {
        let report = SuiteReport {
            name: "s".into(),
            results: vec![ScenarioResult {
                name: "a".into(),
                status: Status::Errored,
                steps_run: 1,
                steps_total: 2,
                error: Some("Navigation to 'x' timed out after 30 seconds".into()),
                duration_ms: 12,
            }],
            passed: 0,
            failed: 0,
            errored: 1,
            skipped: 0,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["status"], "errored");
        assert_eq!(json["errored"], 1);
    }
}
