//! End-to-end integration tests for the scenario runner
//!
//! These tests run the real `webscenario` binary against the bundled
//! `mock_webdriver` server, either as a remote endpoint (`--webdriver-url`)
//! or as a managed driver spawned from the config file.

use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use webscenario::common::config::{Timeouts, WebDriverConfig};
use webscenario::webdriver::WebDriverClient;
use webscenario::{Browser, Error};

/// Parse the "listening at:" address printed by the mock server
fn parse_listen_address(line: &str) -> Option<String> {
    let addr = line.split_once("listening at:")?.1.trim();
    if addr.is_empty() {
        return None;
    }
    Some(addr.to_string())
}

/// A running mock WebDriver server, killed on drop
struct MockWebDriver {
    child: Child,
    url: String,
}

impl MockWebDriver {
    fn start(args: &[&str]) -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_mock_webdriver"))
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start mock webdriver");

        let stdout = child.stdout.take().expect("mock stdout");
        let mut line = String::new();
        BufReader::new(stdout)
            .read_line(&mut line)
            .expect("Failed to read mock address");
        let addr = parse_listen_address(&line).expect("mock did not report its address");

        Self {
            child,
            url: format!("http://{}", addr),
        }
    }
}

impl Drop for MockWebDriver {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Isolated config/data directories for one test
struct TestContext {
    temp_dir: tempfile::TempDir,
    config_path: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[timeouts]\nrequest_secs = 10\n")
            .expect("Failed to write config");
        Self {
            temp_dir,
            config_path,
        }
    }

    /// Config that spawns the mock binary as the chrome driver
    fn with_managed_mock(args: &[&str]) -> Self {
        Self::with_managed_mock_timeouts(args, 10, 10)
    }

    fn with_managed_mock_timeouts(args: &[&str], request_secs: u64, start_secs: u64) -> Self {
        let ctx = Self::new();
        let args = args
            .iter()
            .map(|a| format!("{:?}", a))
            .collect::<Vec<_>>()
            .join(", ");
        let config = format!(
            r#"
[webdriver]
browser = "chrome"

[drivers.chromedriver]
path = {:?}
args = [{}]

[timeouts]
request_secs = {}
driver_start_secs = {}
"#,
            env!("CARGO_BIN_EXE_mock_webdriver"),
            args,
            request_secs,
            start_secs
        );
        std::fs::write(&ctx.config_path, config).expect("Failed to write config");
        ctx
    }

    fn run(&self, args: &[&str]) -> CliOutput {
        let output = Command::new(env!("CARGO_BIN_EXE_webscenario"))
            .arg("--config")
            .arg(&self.config_path)
            .args(args)
            .env("XDG_DATA_HOME", self.temp_dir.path().join("data"))
            .env("NO_COLOR", "1")
            .env("CLICOLOR", "0")
            .output()
            .expect("Failed to run webscenario");

        CliOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        }
    }
}

struct CliOutput {
    stdout: String,
    stderr: String,
    success: bool,
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
        .display()
        .to_string()
}

#[test]
fn test_exact_title_passes() {
    let mock = MockWebDriver::start(&["--title", "Example"]);
    let ctx = TestContext::new();

    let out = ctx.run(&["run", &fixture("example_title.yaml"), "--webdriver-url", &mock.url]);

    assert!(out.success, "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("example title matches"));
    assert!(out.stdout.contains("1 passed, 0 failed, 0 errored"), "{}", out.stdout);
}

#[test]
fn test_title_mismatch_is_failure() {
    let mock = MockWebDriver::start(&["--title", "Example Domain"]);
    let ctx = TestContext::new();

    let out = ctx.run(&["run", &fixture("example_title.yaml"), "--webdriver-url", &mock.url]);

    assert!(!out.success);
    assert!(out.stdout.contains("FAIL"), "{}", out.stdout);
    assert!(out.stdout.contains("expected 'Example', got 'Example Domain'"));
    assert!(out.stderr.contains("1 scenario(s) failed, 0 errored"), "{}", out.stderr);
}

#[test]
fn test_unreachable_host_is_error() {
    let mock = MockWebDriver::start(&[]);
    let ctx = TestContext::new();

    let out = ctx.run(&["run", &fixture("unreachable.yaml"), "--webdriver-url", &mock.url]);

    assert!(!out.success);
    assert!(out.stdout.contains("ERROR at step 1/2"), "{}", out.stdout);
    assert!(out.stdout.contains("ERR_NAME_NOT_RESOLVED"));
    assert!(out.stderr.contains("0 scenario(s) failed, 1 errored"), "{}", out.stderr);
}

#[test]
fn test_navigation_timeout_json_report() {
    let mock = MockWebDriver::start(&[]);
    let ctx = TestContext::new();

    let out = ctx.run(&[
        "run",
        &fixture("slow.yaml"),
        "--webdriver-url",
        &mock.url,
        "--json",
    ]);

    assert!(!out.success);
    let reports: serde_json::Value =
        serde_json::from_str(&out.stdout).expect("stdout should be JSON");
    let result = &reports[0]["results"][0];
    assert_eq!(result["status"], "errored");
    assert_eq!(result["steps_run"], 1);
    assert_eq!(result["steps_total"], 2);
    assert!(result["error"].as_str().unwrap().contains("timed out"));
}

#[test]
fn test_suite_continues_past_failures() {
    let mock = MockWebDriver::start(&["--page", "domain.example.test=Example Domain"]);
    let ctx = TestContext::new();

    let out = ctx.run(&[
        "run",
        &fixture("mixed.yaml"),
        "--webdriver-url",
        &mock.url,
        "--json",
    ]);

    assert!(!out.success);
    let reports: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    let suite = &reports[0];
    assert_eq!(suite["passed"], 1);
    assert_eq!(suite["failed"], 1);
    assert_eq!(suite["errored"], 1);
    let statuses: Vec<&str> = suite["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["status"].as_str().unwrap())
        .collect();
    assert_eq!(statuses, vec!["passed", "failed", "errored"]);
}

#[test]
fn test_filter_selects_scenarios() {
    let mock = MockWebDriver::start(&[]);
    let ctx = TestContext::new();

    let out = ctx.run(&[
        "run",
        &fixture("mixed.yaml"),
        "--webdriver-url",
        &mock.url,
        "--filter",
        "exact",
    ]);

    assert!(out.success, "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("1 passed, 0 failed, 0 errored, 2 skipped"), "{}", out.stdout);
}

#[test]
fn test_builtin_suite_against_mock() {
    let mock = MockWebDriver::start(&["--page", "google.com=Google"]);
    let ctx = TestContext::new();

    let out = ctx.run(&["run", "--webdriver-url", &mock.url, "--verbose"]);

    assert!(out.success, "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("Chimp Jest"));
    assert!(out.stdout.contains("browser should navigate"));
}

#[test]
fn test_managed_driver_is_spawned() {
    let ctx = TestContext::with_managed_mock(&["--title", "Example"]);

    let out = ctx.run(&["run", &fixture("example_title.yaml")]);

    assert!(out.success, "stdout: {}\nstderr: {}", out.stdout, out.stderr);
    assert!(out.stdout.contains("1 passed"));
}

#[test]
fn test_check_reports_ready() {
    let mock = MockWebDriver::start(&[]);
    let ctx = TestContext::new();

    let out = ctx.run(&["check", "--webdriver-url", &mock.url, "--json"]);

    assert!(out.success, "stderr: {}", out.stderr);
    let status: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(status["ready"], true);
    assert_eq!(status["managed"], false);
    assert_eq!(status["url"], mock.url.as_str());
}

#[test]
fn test_managed_driver_that_never_answers_times_out() {
    let ctx = TestContext::with_managed_mock_timeouts(&["--hang"], 10, 1);

    let started = Instant::now();
    let out = ctx.run(&["run", &fixture("example_title.yaml")]);
    let elapsed = started.elapsed();

    assert!(!out.success);
    assert!(
        out.stderr.contains("did not become ready within 1 seconds"),
        "{}",
        out.stderr
    );
    assert!(elapsed < Duration::from_secs(6), "waited {elapsed:?}");
}

#[test]
fn test_managed_driver_exiting_during_startup() {
    let ctx = TestContext::with_managed_mock(&["--exit-code", "3"]);

    let out = ctx.run(&["run", &fixture("example_title.yaml")]);

    assert!(!out.success);
    assert!(out.stderr.contains("exited during startup"), "{}", out.stderr);
}

#[test]
fn test_check_reports_not_ready() {
    let mock = MockWebDriver::start(&["--not-ready"]);
    let ctx = TestContext::new();

    let out = ctx.run(&["check", "--webdriver-url", &mock.url, "--json"]);

    assert!(out.success, "stderr: {}", out.stderr);
    let status: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(status["ready"], false);
    assert_eq!(status["message"], "session already started");

    let out = ctx.run(&["check", "--webdriver-url", &mock.url]);
    assert!(out.success);
    assert!(out.stdout.contains("not ready"), "{}", out.stdout);
}

#[test]
fn test_run_against_not_ready_endpoint_fails() {
    let mock = MockWebDriver::start(&["--not-ready"]);
    let ctx = TestContext::new();

    let out = ctx.run(&["run", &fixture("example_title.yaml"), "--webdriver-url", &mock.url]);

    assert!(!out.success);
    assert!(out.stderr.contains("is not ready"), "{}", out.stderr);
}

#[test]
fn test_check_unreachable_endpoint_fails() {
    let ctx = TestContext::new();

    let out = ctx.run(&["check", "--webdriver-url", "http://127.0.0.1:9"]);

    assert!(!out.success);
    assert!(out.stderr.contains("WebDriver endpoint unavailable"), "{}", out.stderr);
}

#[test]
fn test_list_fixtures_directory() {
    let ctx = TestContext::new();
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures");

    let out = ctx.run(&["list", &dir.display().to_string(), "--json"]);

    assert!(out.success, "stderr: {}", out.stderr);
    let suites: serde_json::Value = serde_json::from_str(&out.stdout).unwrap();
    let names: Vec<&str> = suites
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Example site", "Mixed outcomes", "Slow site", "Unreachable site"]
    );
}

#[test]
fn test_invalid_config_is_reported() {
    let ctx = TestContext::new();
    std::fs::write(&ctx.config_path, "[webdriver\nurl = ").unwrap();

    let out = ctx.run(&["list"]);

    assert!(!out.success);
    assert!(out.stderr.contains("Invalid configuration file"), "{}", out.stderr);
}

#[tokio::test]
async fn test_session_against_mock() {
    let mock = MockWebDriver::start(&["--title", "Example"]);
    let client = WebDriverClient::new(&mock.url, Duration::from_secs(10)).unwrap();

    let session = client
        .new_session(&WebDriverConfig::default(), &Timeouts::default())
        .await
        .unwrap();
    assert!(session.id().starts_with("mock-session-"));

    assert_eq!(session.title().await.unwrap(), "");
    session.navigate("https://example.test/").await.unwrap();
    assert_eq!(session.title().await.unwrap(), "Example");
    assert_eq!(session.current_url().await.unwrap(), "https://example.test/");

    let err = session
        .navigate("https://unreachable.example.test/")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NavigationFailed { .. }), "got {err:?}");

    let err = session.navigate("https://slow.example.test/").await.unwrap_err();
    assert!(matches!(err, Error::NavigationTimeout { secs: 30, .. }), "got {err:?}");

    let err = session.navigate("not a url").await.unwrap_err();
    assert!(matches!(err, Error::InvalidUrl { .. }));

    session.close().await.unwrap();
}
