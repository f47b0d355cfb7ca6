//! Error types for the scenario runner
//!
//! Error messages are meant to be actionable: driver and configuration
//! failures carry hints on how to resolve them.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenario runner
#[derive(Error, Debug)]
pub enum Error {
    // === Driver Errors ===
    #[error("WebDriver binary '{name}' not found. Searched: {searched}. Install it or set [drivers.{name}] path in config")]
    DriverNotFound { name: String, searched: String },

    #[error("WebDriver failed to start: {0}")]
    DriverStartFailed(String),

    #[error("WebDriver did not become ready within {0} seconds")]
    DriverSpawnTimeout(u64),

    #[error("WebDriver endpoint unavailable: {0}")]
    DriverUnavailable(String),

    // === Protocol Errors ===
    #[error("WebDriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    #[error("WebDriver protocol error: {0}")]
    WebDriverProtocol(String),

    // === Navigation Errors ===
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Navigation to '{url}' failed: {message}")]
    NavigationFailed { url: String, message: String },

    #[error("Navigation to '{url}' timed out after {secs} seconds")]
    NavigationTimeout { url: String, secs: u64 },

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Invalid scenario file '{path}': {message}")]
    ScenarioParse { path: String, message: String },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Test Errors ===
    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("{failed} scenario(s) failed, {errored} errored")]
    ScenariosFailed { failed: usize, errored: usize },

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a driver not found error with search locations
    pub fn driver_not_found<S: AsRef<str>>(name: &str, searched: &[S]) -> Self {
        Self::DriverNotFound {
            name: name.to_string(),
            searched: searched
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create an error from a WebDriver error response
    pub fn webdriver(error: &str, message: &str) -> Self {
        Self::WebDriver {
            error: error.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a scenario parse error
    pub fn scenario_parse(path: &std::path::Path, message: impl ToString) -> Self {
        Self::ScenarioParse {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Whether this is an assertion failure rather than a harness error
    pub fn is_assertion(&self) -> bool {
        matches!(self, Self::TestAssertion(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::DriverUnavailable(format!("request timed out: {}", e))
        } else if e.is_connect() {
            Error::DriverUnavailable(format!("connection failed: {}", e))
        } else if e.is_decode() {
            Error::WebDriverProtocol(format!("malformed response: {}", e))
        } else {
            Error::DriverUnavailable(e.to_string())
        }
    }
}
