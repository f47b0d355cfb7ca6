//! Mock WebDriver server for integration testing
//!
//! Implements the handful of W3C WebDriver endpoints the runner uses, over
//! plain HTTP/1.1 with one request per connection, so tests can run without a
//! real browser.
//!
//! Options:
//! - `--port=N` / `--port N`: listen port (default 0 = any free port)
//! - `--title T`: title reported for every loaded page (default "Example")
//! - `--page HOST=TITLE`: title for pages on HOST (repeatable)
//! - `--not-ready`: `/status` reports `ready: false`
//! - `--hang`: accept connections but never answer
//! - `--exit-code N`: exit immediately with status N
//!
//! Navigating to a host containing `unreachable` fails with `unknown error`,
//! a host containing `slow` fails with `timeout`.

use serde_json::{json, Value};
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct Options {
    port: u16,
    title: String,
    pages: HashMap<String, String>,
    ready: bool,
    hang: bool,
    exit_code: Option<i32>,
}

impl Options {
    fn from_args() -> Self {
        let mut options = Options {
            port: 0,
            title: "Example".to_string(),
            pages: HashMap::new(),
            ready: true,
            hang: false,
            exit_code: None,
        };

        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--not-ready" => {
                    options.ready = false;
                    i += 1;
                    continue;
                }
                "--hang" => {
                    options.hang = true;
                    i += 1;
                    continue;
                }
                _ => {}
            }
            let (flag, inline) = match args[i].split_once('=') {
                Some((f, v)) if f.starts_with("--") => (f.to_string(), Some(v.to_string())),
                _ => (args[i].clone(), None),
            };
            let value = match inline {
                Some(v) => Some(v),
                None => {
                    i += 1;
                    args.get(i).cloned()
                }
            };
            match (flag.as_str(), value) {
                ("--port", Some(v)) => options.port = v.parse().unwrap_or(0),
                ("--title", Some(v)) => options.title = v,
                ("--exit-code", Some(v)) => options.exit_code = v.parse().ok(),
                ("--page", Some(v)) => {
                    if let Some((host, title)) = v.split_once('=') {
                        options.pages.insert(host.to_string(), title.to_string());
                    }
                }
                _ => {}
            }
            i += 1;
        }

        options
    }
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    /// session id -> current url
    sessions: HashMap<String, String>,
}

fn main() {
    let options = Arc::new(Options::from_args());
    if let Some(code) = options.exit_code {
        eprintln!("mock webdriver: exiting with {}", code);
        std::process::exit(code);
    }
    let listener = match TcpListener::bind(("127.0.0.1", options.port)) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("mock webdriver: bind failed: {}", e);
            std::process::exit(1);
        }
    };

    if let Ok(addr) = listener.local_addr() {
        println!("mock webdriver listening at: {}", addr);
        std::io::stdout().flush().ok();
    }

    let state = Arc::new(Mutex::new(MockState::default()));

    for stream in listener.incoming() {
        let Ok(stream) = stream else { continue };
        let state = Arc::clone(&state);
        let options = Arc::clone(&options);
        std::thread::spawn(move || handle_connection(stream, &state, &options));
    }
}

fn handle_connection(stream: TcpStream, state: &Mutex<MockState>, options: &Options) {
    let Ok(read_half) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(read_half);

    if options.hang {
        // Hold the connection open without answering
        let mut request_line = String::new();
        let _ = reader.read_line(&mut request_line);
        loop {
            std::thread::sleep(Duration::from_secs(3600));
        }
    }

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
        return;
    }
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or("").to_string();
    let path = parts.next().unwrap_or("").to_string();

    let mut content_length = 0usize;
    loop {
        let mut header = String::new();
        if reader.read_line(&mut header).unwrap_or(0) == 0 {
            break;
        }
        let header = header.trim_end();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }

    let mut body = vec![0u8; content_length];
    if content_length > 0 && reader.read_exact(&mut body).is_err() {
        return;
    }
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let (code, response) = route(&method, &path, &body, state, options);
    send_response(stream, code, &response);
}

fn route(
    method: &str,
    path: &str,
    body: &Value,
    state: &Mutex<MockState>,
    options: &Options,
) -> (u16, Value) {
    let Ok(mut state) = state.lock() else {
        return error(500, "unknown error", "state poisoned");
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        ("GET", ["status"]) if options.ready => {
            ok(json!({ "ready": true, "message": "mock webdriver ready" }))
        }
        ("GET", ["status"]) => ok(json!({ "ready": false, "message": "session already started" })),

        ("POST", ["session"]) => {
            state.next_id += 1;
            let id = format!("mock-session-{}", state.next_id);
            state.sessions.insert(id.clone(), "about:blank".to_string());
            let browser_name = body["capabilities"]["alwaysMatch"]["browserName"]
                .as_str()
                .unwrap_or("chrome")
                .to_string();
            ok(json!({
                "sessionId": id,
                "capabilities": { "browserName": browser_name }
            }))
        }

        ("DELETE", ["session", id]) => match state.sessions.remove(*id) {
            Some(_) => ok(Value::Null),
            None => invalid_session(id),
        },

        (_, ["session", id, command]) => {
            let Some(current) = state.sessions.get_mut(*id) else {
                return invalid_session(id);
            };
            match (method, *command) {
                ("POST", "timeouts") => ok(Value::Null),
                ("POST", "url") => {
                    let Some(target) = body["url"].as_str() else {
                        return error(400, "invalid argument", "missing 'url'");
                    };
                    let host = url::Url::parse(target)
                        .ok()
                        .and_then(|u| u.host_str().map(str::to_string));
                    let Some(host) = host else {
                        return error(400, "invalid argument", "url has no host");
                    };
                    if host.contains("unreachable") {
                        return error(500, "unknown error", "net::ERR_NAME_NOT_RESOLVED");
                    }
                    if host.contains("slow") {
                        return error(500, "timeout", "Timed out receiving message from renderer");
                    }
                    *current = target.to_string();
                    ok(Value::Null)
                }
                ("GET", "title") => ok(json!(title_for(current, options))),
                ("GET", "url") => ok(json!(current.clone())),
                _ => error(404, "unknown command", &format!("{} {}", method, path)),
            }
        }

        _ => error(404, "unknown command", &format!("{} {}", method, path)),
    }
}

fn title_for(current: &str, options: &Options) -> String {
    if current == "about:blank" {
        return String::new();
    }
    url::Url::parse(current)
        .ok()
        .and_then(|u| u.host_str().and_then(|h| options.pages.get(h).cloned()))
        .unwrap_or_else(|| options.title.clone())
}

fn ok(value: Value) -> (u16, Value) {
    (200, json!({ "value": value }))
}

fn error(code: u16, error: &str, message: &str) -> (u16, Value) {
    (
        code,
        json!({ "value": { "error": error, "message": message, "stacktrace": "" } }),
    )
}

fn invalid_session(id: &str) -> (u16, Value) {
    error(404, "invalid session id", &format!("no session {}", id))
}

fn send_response(mut stream: TcpStream, code: u16, body: &Value) {
    let reason = match code {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    };
    let body = body.to_string();
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        code,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).ok();
    stream.flush().ok();
}
