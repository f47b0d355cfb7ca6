//! Scenario file types
//!
//! Defines the data structures for deserializing YAML scenario suites and
//! loading them from files or directories.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

use super::registry::Suite;

/// A suite of scenarios loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct SuiteFile {
    /// Name of the suite
    pub name: String,
    /// Optional description of what the suite covers
    pub description: Option<String>,
    /// Scenarios, run in file order
    pub scenarios: Vec<ScenarioDef>,
}

/// A single named scenario
#[derive(Deserialize, Debug)]
pub struct ScenarioDef {
    /// Name of the scenario
    pub name: String,
    /// The sequence of steps to execute
    pub steps: Vec<Step>,
}

/// A single step in a scenario
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    /// Navigate the browser and wait for the page to load
    Navigate {
        /// Absolute URL to open
        url: String,
    },
    /// Read the page title and check it
    AssertTitle {
        /// Expected title (exact match)
        equals: Option<String>,
        /// Expected title substring
        contains: Option<String>,
    },
    /// Read the current URL and check it
    AssertUrl {
        /// Expected URL (exact match)
        equals: Option<String>,
        /// Expected URL substring
        contains: Option<String>,
    },
}

impl Step {
    /// Short human-readable form, e.g. `navigate https://example.test/`
    pub fn describe(&self) -> String {
        match self {
            Step::Navigate { url } => format!("navigate {}", url),
            Step::AssertTitle { equals, contains } => {
                format!("assert title{}", describe_expectation(equals, contains))
            }
            Step::AssertUrl { equals, contains } => {
                format!("assert url{}", describe_expectation(equals, contains))
            }
        }
    }

    fn validate(&self) -> std::result::Result<(), String> {
        match self {
            Step::Navigate { url } => url::Url::parse(url)
                .map(|_| ())
                .map_err(|e| format!("invalid url '{}': {}", url, e)),
            Step::AssertTitle { equals, contains } | Step::AssertUrl { equals, contains } => {
                if equals.is_none() && contains.is_none() {
                    Err(format!("{} needs 'equals' or 'contains'", self.describe()))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn describe_expectation(equals: &Option<String>, contains: &Option<String>) -> String {
    let mut out = String::new();
    if let Some(e) = equals {
        out.push_str(&format!(" == '{}'", e));
    }
    if let Some(c) = contains {
        out.push_str(&format!(" contains '{}'", c));
    }
    out
}

impl SuiteFile {
    /// Parse and validate a suite from YAML text
    pub fn parse(content: &str, path: &Path) -> Result<Self> {
        let file: SuiteFile =
            serde_yaml::from_str(content).map_err(|e| Error::scenario_parse(path, e))?;

        if file.scenarios.is_empty() {
            return Err(Error::scenario_parse(path, "suite has no scenarios"));
        }
        for scenario in &file.scenarios {
            if scenario.steps.is_empty() {
                return Err(Error::scenario_parse(
                    path,
                    format!("scenario '{}' has no steps", scenario.name),
                ));
            }
            for step in &scenario.steps {
                step.validate().map_err(|msg| {
                    Error::scenario_parse(path, format!("scenario '{}': {}", scenario.name, msg))
                })?;
            }
        }

        Ok(file)
    }

    /// Register every scenario of this file in a new [`Suite`]
    pub fn into_suite(self) -> Suite {
        let mut suite = Suite::new(self.name);
        suite.description = self.description;
        for scenario in self.scenarios {
            suite.steps(scenario.name, scenario.steps);
        }
        suite
    }
}

/// Load a single suite file
pub fn load_suite(path: &Path) -> Result<Suite> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.display().to_string(),
        error: e.to_string(),
    })?;
    Ok(SuiteFile::parse(&content, path)?.into_suite())
}

/// Load suites from files and directories
///
/// Directories contribute their `*.yaml` / `*.yml` files (not recursive),
/// sorted by file name.
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<Suite>> {
    let mut suites = Vec::new();
    for path in paths {
        if path.is_dir() {
            let files = suite_files(path)?;
            if files.is_empty() {
                tracing::warn!("No scenario files in {}", path.display());
            }
            for file in files {
                suites.push(load_suite(&file)?);
            }
        } else {
            suites.push(load_suite(path)?);
        }
    }
    Ok(suites)
}

/// Scenario files directly inside `dir`, sorted
fn suite_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::FileRead {
        path: dir.display().to_string(),
        error: e.to_string(),
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.is_file()
                && matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("yaml") | Some("yml")
                )
        })
        .collect();
    files.sort();
    Ok(files)
}
