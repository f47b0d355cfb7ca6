//! WebDriver wire types
//!
//! Every W3C WebDriver response wraps its payload in a `value` field; errors
//! use the same envelope with an `error` code and `message`.
//! See: https://www.w3.org/TR/webdriver2/

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::common::config::BrowserKind;

/// Envelope for every WebDriver response body
#[derive(Debug, Clone, Deserialize)]
pub struct ValueResponse<T> {
    pub value: T,
}

/// Error payload carried in `value` for non-2xx responses
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorValue {
    pub error: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stacktrace: Option<String>,
}

/// `GET /status` payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatusValue {
    pub ready: bool,
    #[serde(default)]
    pub message: String,
}

/// `POST /session` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionValue {
    pub session_id: String,
    #[serde(default)]
    pub capabilities: Value,
}

/// `POST /session/{id}/url` body
#[derive(Debug, Clone, Serialize)]
pub struct NavigateRequest<'a> {
    pub url: &'a str,
}

/// `POST /session/{id}/timeouts` body (milliseconds)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutsRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_load: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implicit: Option<u64>,
}

/// Well-known WebDriver error codes
pub mod error_codes {
    pub const TIMEOUT: &str = "timeout";
    pub const INVALID_SESSION_ID: &str = "invalid session id";
}

/// Build the `POST /session` body for a browser
pub fn new_session_request(browser: BrowserKind, headless: bool, extra_args: &[String]) -> Value {
    let mut args: Vec<String> = Vec::new();
    if headless {
        args.push(
            match browser {
                BrowserKind::Firefox => "-headless",
                BrowserKind::Chrome | BrowserKind::Edge => "--headless=new",
            }
            .to_string(),
        );
    }
    args.extend(extra_args.iter().cloned());

    let mut always_match = Map::new();
    always_match.insert("browserName".into(), json!(browser.browser_name()));
    let options_key = match browser {
        BrowserKind::Chrome => "goog:chromeOptions",
        BrowserKind::Firefox => "moz:firefoxOptions",
        BrowserKind::Edge => "ms:edgeOptions",
    };
    always_match.insert(options_key.into(), json!({ "args": args }));

    json!({ "capabilities": { "alwaysMatch": Value::Object(always_match) } })
}
