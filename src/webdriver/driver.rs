//! Driver endpoint management
//!
//! Either uses a remote WebDriver URL as-is, or spawns the local driver
//! binary for the selected browser on a free port and waits for it to report
//! ready. A spawned driver is killed when the [`DriverEndpoint`] is dropped.

use std::net::TcpListener;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::{Child, Command};

use crate::common::config::Config;
use crate::common::{Error, Result};

use super::client::WebDriverClient;

/// Interval between readiness probes
const READY_POLL_MS: u64 = 50;

/// A usable WebDriver endpoint, possibly owning the driver process
pub struct DriverEndpoint {
    client: WebDriverClient,
    child: Option<Child>,
}

impl DriverEndpoint {
    /// Client for this endpoint
    pub fn client(&self) -> &WebDriverClient {
        &self.client
    }

    /// Whether the driver process is owned by this endpoint
    pub fn is_managed(&self) -> bool {
        self.child.is_some()
    }

    /// Stop the managed driver, if any
    pub async fn shutdown(mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill().await {
                tracing::warn!("Failed to stop driver: {}", e);
            }
        }
    }
}

/// Connect to the endpoint for a run without checking readiness
///
/// A configured `webdriver.url` is used as-is; otherwise the driver for
/// `webdriver.browser` is spawned locally, which only returns once the
/// driver reports ready.
pub async fn connect(config: &Config) -> Result<DriverEndpoint> {
    match &config.webdriver.url {
        Some(url) => {
            let client =
                WebDriverClient::new(url, Duration::from_secs(config.timeouts.request_secs))?;
            tracing::debug!("Using remote WebDriver at {}", url);
            Ok(DriverEndpoint {
                client,
                child: None,
            })
        }
        None => spawn_driver(config).await,
    }
}

/// Resolve the endpoint to use for a run and require it to be ready
pub async fn ensure_driver(config: &Config) -> Result<DriverEndpoint> {
    let endpoint = connect(config).await?;
    if !endpoint.is_managed() {
        let status = endpoint.client.status().await?;
        if !status.ready {
            return Err(Error::DriverUnavailable(format!(
                "{} is not ready: {}",
                endpoint.client.base_url(),
                status.message
            )));
        }
    }
    Ok(endpoint)
}

/// Spawn the local driver binary and wait for readiness
async fn spawn_driver(config: &Config) -> Result<DriverEndpoint> {
    let name = config.webdriver.browser.driver_name();
    let driver = config
        .get_driver(name)
        .ok_or_else(|| Error::driver_not_found(name, &["config [drivers]", "PATH"]))?;

    let port = free_port()?;
    tracing::debug!("Spawning {} on port {}", driver.path.display(), port);

    let mut cmd = Command::new(&driver.path);
    cmd.args(port_args(name, port))
        .args(&driver.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|e| {
        Error::DriverStartFailed(format!("Failed to start {}: {}", driver.path.display(), e))
    })?;

    let url = format!("http://127.0.0.1:{}", port);
    let client = WebDriverClient::new(&url, Duration::from_secs(config.timeouts.request_secs))?;

    let start_secs = config.timeouts.driver_start_secs;
    let deadline = Instant::now() + Duration::from_secs(start_secs);

    loop {
        if let Some(status) = child.try_wait()? {
            return Err(Error::DriverStartFailed(format!(
                "{} exited during startup with {}",
                name, status
            )));
        }

        // A driver that accepts connections but never answers must not
        // stretch the wait past the start deadline
        let probe = tokio::time::timeout_at(deadline.into(), client.status()).await;
        if let Ok(Ok(status)) = probe {
            if status.ready {
                tracing::info!("{} ready at {}", name, url);
                return Ok(DriverEndpoint {
                    client,
                    child: Some(child),
                });
            }
        }

        if Instant::now() >= deadline {
            let _ = child.kill().await;
            return Err(Error::DriverSpawnTimeout(start_secs));
        }

        tokio::time::sleep(Duration::from_millis(READY_POLL_MS)).await;
    }
}

/// Command-line arguments selecting the listen port for a driver binary
fn port_args(driver_name: &str, port: u16) -> Vec<String> {
    match driver_name {
        "geckodriver" => vec!["--port".to_string(), port.to_string()],
        _ => vec![format!("--port={}", port)],
    }
}

/// Ask the OS for an unused local port
fn free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
