//! Assertion helpers for scenario bodies
//!
//! Failures are returned as [`Error::TestAssertion`] so the runner can tell a
//! failed check apart from a browser or driver error.

use crate::common::{Error, Result};

/// Fail unless `actual` is exactly `expected`
pub fn expect_equal(what: &str, actual: &str, expected: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::TestAssertion(format!(
            "{}: expected '{}', got '{}'",
            what, expected, actual
        )))
    }
}

/// Fail unless `actual` contains `needle`
pub fn expect_contains(what: &str, actual: &str, needle: &str) -> Result<()> {
    if actual.contains(needle) {
        Ok(())
    } else {
        Err(Error::TestAssertion(format!(
            "{}: expected to contain '{}', got '{}'",
            what, needle, actual
        )))
    }
}
