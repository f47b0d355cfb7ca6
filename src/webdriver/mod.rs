//! W3C WebDriver support
//!
//! The concrete browser harness: an HTTP client for WebDriver endpoints and
//! management of local driver processes.

pub mod client;
pub mod driver;
pub mod types;

pub use client::{Session, WebDriverClient};
pub use driver::{connect, ensure_driver, DriverEndpoint};
