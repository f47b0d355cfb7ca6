//! Scenario registration
//!
//! A [`Suite`] is an ordered list of named scenarios. Scenarios are either
//! declarative step lists (from YAML) or async closures registered in code
//! with [`Suite::it`].

use futures_util::future::BoxFuture;

use crate::browser::Browser;
use crate::common::Result;

use super::config::Step;

/// Async scenario body borrowing the browser for its whole run
pub type ScenarioFn =
    Box<dyn for<'a> Fn(&'a dyn Browser) -> BoxFuture<'a, Result<()>> + Send + Sync>;

/// What a registered scenario executes
pub enum ScenarioBody {
    /// Declarative steps, run one by one
    Steps(Vec<Step>),
    /// A code-defined body
    Code(ScenarioFn),
}

/// A named scenario in a suite
pub struct RegisteredScenario {
    pub name: String,
    pub body: ScenarioBody,
}

impl RegisteredScenario {
    /// Number of steps reported for this scenario (a code body counts as one)
    pub fn steps_total(&self) -> usize {
        match &self.body {
            ScenarioBody::Steps(steps) => steps.len(),
            ScenarioBody::Code(_) => 1,
        }
    }
}

impl std::fmt::Debug for RegisteredScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.body {
            ScenarioBody::Steps(_) => "steps",
            ScenarioBody::Code(_) => "code",
        };
        f.debug_struct("RegisteredScenario")
            .field("name", &self.name)
            .field("body", &kind)
            .finish()
    }
}

/// A named group of scenarios
#[derive(Debug)]
pub struct Suite {
    pub name: String,
    pub description: Option<String>,
    scenarios: Vec<RegisteredScenario>,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            scenarios: Vec::new(),
        }
    }

    /// Register a code-defined scenario
    ///
    /// ```rust,no_run
    /// use webscenario::testing::{expect_equal, Suite};
    ///
    /// let mut suite = Suite::new("smoke");
    /// suite.it("home page title", |browser| {
    ///     Box::pin(async move {
    ///         browser.navigate("https://example.test/").await?;
    ///         let title = browser.title().await?;
    ///         expect_equal("title", &title, "Example")
    ///     })
    /// });
    /// ```
    pub fn it<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: for<'a> Fn(&'a dyn Browser) -> BoxFuture<'a, Result<()>> + Send + Sync + 'static,
    {
        self.scenarios.push(RegisteredScenario {
            name: name.into(),
            body: ScenarioBody::Code(Box::new(body)),
        });
        self
    }

    /// Register a declarative scenario
    pub fn steps(&mut self, name: impl Into<String>, steps: Vec<Step>) -> &mut Self {
        self.scenarios.push(RegisteredScenario {
            name: name.into(),
            body: ScenarioBody::Steps(steps),
        });
        self
    }

    /// Scenarios in registration order
    pub fn scenarios(&self) -> &[RegisteredScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}
