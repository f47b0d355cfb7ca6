//! Browser handle abstraction
//!
//! Scenarios only see this trait. The WebDriver [`Session`](crate::webdriver::Session)
//! implements it for real browsers; tests substitute scripted handles.

use async_trait::async_trait;

use crate::common::Result;

/// A controllable browser instance
///
/// Every call suspends until the browser has finished the operation or the
/// harness reports a failure.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Navigate to `url`, returning once the page has loaded
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Title of the current document
    async fn title(&self) -> Result<String>;

    /// URL of the current document
    async fn current_url(&self) -> Result<String>;
}
