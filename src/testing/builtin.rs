//! Built-in navigation suite, run when no scenario files are given

use super::assert::expect_equal;
use super::registry::Suite;

pub const SUITE_NAME: &str = "Chimp Jest";
pub const SCENARIO_NAME: &str = "browser should navigate";
pub const TARGET_URL: &str = "https://google.com/";
pub const EXPECTED_TITLE: &str = "Google";

/// Navigate to the target URL and check the page title
pub fn navigation_suite() -> Suite {
    let mut suite = Suite::new(SUITE_NAME);
    suite.it(SCENARIO_NAME, |browser| {
        Box::pin(async move {
            browser.navigate(TARGET_URL).await?;
            let title = browser.title().await?;
            expect_equal("title", &title, EXPECTED_TITLE)
        })
    });
    suite
}
