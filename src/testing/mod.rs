//! Scenario runner
//!
//! Suites of named scenarios are registered in code or loaded from YAML,
//! then executed against a [`Browser`](crate::browser::Browser). Each
//! scenario ends as passed, failed (assertion) or errored (harness).

mod assert;
pub mod builtin;
mod config;
mod registry;
pub mod report;
mod runner;

pub use assert::{expect_contains, expect_equal};
pub use config::*;
pub use registry::{RegisteredScenario, ScenarioBody, ScenarioFn, Suite};
pub use runner::{run_scenario, run_suite, RunOptions, ScenarioResult, Status, SuiteReport};
