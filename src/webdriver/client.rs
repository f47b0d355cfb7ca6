//! WebDriver HTTP client
//!
//! Speaks the W3C WebDriver protocol to chromedriver, geckodriver or any
//! remote endpoint. A [`WebDriverClient`] talks to the endpoint; a
//! [`Session`] is one browser opened through it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::browser::Browser;
use crate::common::config::{Timeouts, WebDriverConfig};
use crate::common::{Error, Result};

use super::types::*;

/// Client for a single WebDriver endpoint
#[derive(Clone)]
pub struct WebDriverClient {
    http: reqwest::Client,
    /// Endpoint base without trailing slash, e.g. `http://127.0.0.1:9515`
    base: String,
}

impl WebDriverClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, request_timeout: Duration) -> Result<Self> {
        let parsed = url::Url::parse(base_url).map_err(|e| {
            Error::Config(format!("Invalid WebDriver URL '{}': {}", base_url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "WebDriver URL must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Endpoint base URL
    pub fn base_url(&self) -> &str {
        &self.base
    }

    /// Send a request and unwrap the `value` envelope
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let url = format!("{}/{}", self.base, path.trim_start_matches('/'));

        let mut req = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        if let Some(timeout) = timeout {
            req = req.timeout(timeout);
        }

        tracing::debug!(
            "WebDriver >>> {} {} {}",
            method,
            path,
            body.map(|b| b.to_string()).unwrap_or_default()
        );

        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        tracing::debug!("WebDriver <<< {} {}", status.as_u16(), text);

        if !status.is_success() {
            return Err(match serde_json::from_str::<ValueResponse<ErrorValue>>(&text) {
                Ok(err) => Error::webdriver(&err.value.error, &err.value.message),
                Err(_) => Error::WebDriverProtocol(format!(
                    "{} {} returned HTTP {}: {}",
                    method,
                    path,
                    status.as_u16(),
                    text
                )),
            });
        }

        let parsed: ValueResponse<T> = serde_json::from_str(&text).map_err(|e| {
            Error::WebDriverProtocol(format!("Failed to parse {} {} response: {}", method, path, e))
        })?;
        Ok(parsed.value)
    }

    /// Query endpoint readiness
    pub async fn status(&self) -> Result<StatusValue> {
        self.request(Method::GET, "status", None, None).await
    }

    /// Open a new browser session configured from `webdriver` and `timeouts`
    pub async fn new_session(
        &self,
        webdriver: &WebDriverConfig,
        timeouts: &Timeouts,
    ) -> Result<Session> {
        let body = new_session_request(webdriver.browser, webdriver.headless, &webdriver.args);
        let created: NewSessionValue = self
            .request(Method::POST, "session", Some(&body), None)
            .await?;

        tracing::info!(
            "Opened {} session {}",
            webdriver.browser.browser_name(),
            created.session_id
        );

        let session = Session {
            client: self.clone(),
            id: created.session_id,
            page_load: Duration::from_secs(timeouts.page_load_secs),
            request_timeout: Duration::from_secs(timeouts.request_secs),
        };
        session.set_page_load_timeout().await?;
        Ok(session)
    }
}

/// An open browser session
pub struct Session {
    client: WebDriverClient,
    id: String,
    page_load: Duration,
    request_timeout: Duration,
}

impl Session {
    /// WebDriver session id
    pub fn id(&self) -> &str {
        &self.id
    }

    fn path(&self, command: &str) -> String {
        format!("session/{}/{}", self.id, command)
    }

    async fn set_page_load_timeout(&self) -> Result<()> {
        let body = serde_json::to_value(TimeoutsRequest {
            page_load: Some(self.page_load.as_millis() as u64),
            script: None,
            implicit: None,
        })?;
        let _: Value = self
            .client
            .request(Method::POST, &self.path("timeouts"), Some(&body), None)
            .await?;
        Ok(())
    }

    /// End the session; the browser window is closed by the driver
    pub async fn close(self) -> Result<()> {
        let path = format!("session/{}", self.id);
        let _: Value = self.client.request(Method::DELETE, &path, None, None).await?;
        tracing::info!("Closed session {}", self.id);
        Ok(())
    }
}

#[async_trait]
impl Browser for Session {
    async fn navigate(&self, url: &str) -> Result<()> {
        url::Url::parse(url).map_err(|e| Error::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let body = serde_json::to_value(NavigateRequest { url })?;
        // The driver answers only once the page has loaded (or pageLoad expired)
        let deadline = self.page_load + self.request_timeout;

        let result: Result<Value> = self
            .client
            .request(Method::POST, &self.path("url"), Some(&body), Some(deadline))
            .await;

        match result {
            Ok(_) => {
                tracing::debug!("Navigated to {}", url);
                Ok(())
            }
            Err(Error::WebDriver { error, .. }) if error == error_codes::TIMEOUT => {
                Err(Error::NavigationTimeout {
                    url: url.to_string(),
                    secs: self.page_load.as_secs(),
                })
            }
            Err(Error::WebDriver { error, message }) if error != error_codes::INVALID_SESSION_ID => {
                Err(Error::NavigationFailed {
                    url: url.to_string(),
                    message: format!("{}: {}", error, message),
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn title(&self) -> Result<String> {
        self.client
            .request(Method::GET, &self.path("title"), None, None)
            .await
    }

    async fn current_url(&self) -> Result<String> {
        self.client
            .request(Method::GET, &self.path("url"), None, None)
            .await
    }
}
