//! Browser scenario runner
//!
//! Runs named browser scenarios (navigate, read the page, assert) against
//! WebDriver sessions and reports each as passed, failed or errored.

pub mod browser;
pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;
pub mod webdriver;

// Re-export commonly used types for tests
pub use browser::Browser;
pub use common::{Error, Result};
