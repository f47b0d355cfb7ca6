//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// WebDriver endpoint and browser settings
    #[serde(default)]
    pub webdriver: WebDriverConfig,

    /// Explicit driver binary locations, keyed by binary name
    #[serde(default)]
    pub drivers: HashMap<String, DriverConfig>,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Browser to request from the WebDriver endpoint
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BrowserKind {
    /// Google Chrome / Chromium via chromedriver
    #[default]
    Chrome,
    /// Mozilla Firefox via geckodriver
    Firefox,
    /// Microsoft Edge via msedgedriver
    Edge,
}

impl BrowserKind {
    /// W3C `browserName` capability value
    pub fn browser_name(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "MicrosoftEdge",
        }
    }

    /// Name of the driver binary serving this browser
    pub fn driver_name(&self) -> &'static str {
        match self {
            Self::Chrome => "chromedriver",
            Self::Firefox => "geckodriver",
            Self::Edge => "msedgedriver",
        }
    }
}

/// WebDriver endpoint settings
#[derive(Debug, Deserialize, Clone)]
pub struct WebDriverConfig {
    /// Remote endpoint; when unset a local driver is spawned
    pub url: Option<String>,

    #[serde(default)]
    pub browser: BrowserKind,

    #[serde(default = "default_true")]
    pub headless: bool,

    /// Extra browser arguments
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            url: None,
            browser: BrowserKind::default(),
            headless: true,
            args: Vec::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Configuration for a driver binary
#[derive(Debug, Deserialize, Clone)]
pub struct DriverConfig {
    /// Path to the driver executable
    pub path: PathBuf,

    /// Additional arguments to pass to the driver
    #[serde(default)]
    pub args: Vec<String>,
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize, Clone)]
pub struct Timeouts {
    /// Timeout for a single WebDriver HTTP request
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Page load timeout applied to the browser session
    #[serde(default = "default_page_load")]
    pub page_load_secs: u64,

    /// How long to wait for a spawned driver to report ready
    #[serde(default = "default_driver_start")]
    pub driver_start_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
            page_load_secs: default_page_load(),
            driver_start_secs: default_driver_start(),
        }
    }
}

fn default_request() -> u64 {
    30
}
fn default_page_load() -> u64 {
    30
}
fn default_driver_start() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Deserialize, Default, Clone)]
pub struct LoggingConfig {
    /// Also write logs to `<data dir>/logs/webscenario.log`
    #[serde(default)]
    pub file: bool,
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| super::Error::FileRead {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| super::Error::ConfigParse(e.to_string()))
    }

    /// Get driver configuration by binary name
    ///
    /// Falls back to searching PATH if not explicitly configured
    pub fn get_driver(&self, name: &str) -> Option<DriverConfig> {
        if let Some(config) = self.drivers.get(name) {
            return Some(config.clone());
        }

        which::which(name).ok().map(|path| DriverConfig {
            path,
            args: Vec::new(),
        })
    }
}
