//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives the builders over
//! real HTTP through a ureq-backed [`Transport`] that completes on a spawned
//! thread — so these tests also exercise the "completion runs on an
//! unspecified context" contract. Tests await completions through mpsc
//! channels.

use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use url::Url;
use xhr_core::{json_get_path, request_path, Error, Method, Request, Response, Transport, TransportCallback};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport that executes each request with ureq on a fresh thread.
///
/// Non-2xx statuses are returned as data (`http_status_as_error(false)`),
/// matching the builder's contract that this layer never interprets status
/// codes.
struct UreqTransport;

impl Transport for UreqTransport {
    fn perform(&self, request: Request, done: TransportCallback) {
        std::thread::spawn(move || done(execute(request)));
    }
}

fn execute(request: Request) -> Result<Response, Error> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let Request {
        url,
        method,
        headers,
        body,
    } = request;

    let mut response = match (method, body) {
        (Method::Get, _) => {
            let mut req = agent.get(url.as_str());
            for (name, value) in &headers {
                req = req.header(name.as_str(), value.as_str());
            }
            req.call()
        }
        (Method::Post, Some(bytes)) => {
            let mut req = agent.post(url.as_str());
            for (name, value) in &headers {
                req = req.header(name.as_str(), value.as_str());
            }
            req.send(&bytes[..])
        }
        (Method::Post, None) => {
            let mut req = agent.post(url.as_str());
            for (name, value) in &headers {
                req = req.header(name.as_str(), value.as_str());
            }
            req.send_empty()
        }
    }
    .map_err(|e| Error::Transport(e.to_string()))?;

    let status = response.status().as_u16();
    let response_headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| Error::Transport(e.to_string()))?;

    Ok(Response {
        status,
        headers: response_headers,
        body,
    })
}

/// Start the mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn transport() -> Arc<dyn Transport> {
    Arc::new(UreqTransport)
}

#[test]
fn json_get_delivers_parsed_body() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    json_get_path(transport(), &format!("http://{addr}/json"), move |result| {
        tx.send(result).unwrap();
    });

    let value = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap();
    assert_eq!(value, serde_json::json!({"a": 1}));
}

#[test]
fn malformed_body_surfaces_parse_error() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    json_get_path(transport(), &format!("http://{addr}/not-json"), move |result| {
        tx.send(result).unwrap();
    });

    let err = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap_err();
    assert!(matches!(err, Error::JsonParse { .. }));
}

#[test]
fn connection_failure_reaches_completion() {
    // Bind then drop a listener so the port is very likely unoccupied.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let (tx, rx) = mpsc::channel();

    json_get_path(transport(), &format!("http://{addr}/json"), move |result| {
        tx.send(result).unwrap();
    });

    let err = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap_err();
    assert!(matches!(err, Error::Transport(_)));
}

#[test]
fn post_text_round_trips_through_echo() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    request_path(transport(), &format!("http://{addr}/echo"))
        .unwrap()
        .mime_type("text/plain")
        .post_text("hello", move |result| tx.send(result).unwrap());

    let response = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, b"hello");
}

#[test]
fn post_without_body_sends_empty_payload() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    request_path(transport(), &format!("http://{addr}/echo"))
        .unwrap()
        .post(move |result| tx.send(result).unwrap());

    let response = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap();
    assert_eq!(response.status, 200);
    assert!(response.body.is_empty());
}

#[test]
fn headers_reach_the_wire_last_write_wins() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    let url = Url::parse(&format!("http://{addr}/headers")).unwrap();
    xhr_core::json(transport(), url)
        .header("X-Probe", "value-a")
        .header("x-probe", "value-b")
        .get(move |result| tx.send(result).unwrap());

    let reflected = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap();
    assert_eq!(reflected["x-probe"], "value-b");
    assert_eq!(reflected["accept"], "application/json");
    assert_eq!(reflected["content-type"], "application/json");
}

#[test]
fn non_2xx_passes_through_as_response() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    request_path(transport(), &format!("http://{addr}/status/503"))
        .unwrap()
        .get(move |result| tx.send(result).unwrap());

    let response = rx.recv_timeout(RECV_TIMEOUT).unwrap().unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.body, b"status 503");
}

#[test]
fn completion_runs_off_the_calling_thread() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();

    request_path(transport(), &format!("http://{addr}/json"))
        .unwrap()
        .get(move |_| tx.send(std::thread::current().id()).unwrap());

    let completion_thread = rx.recv_timeout(RECV_TIMEOUT).unwrap();
    assert_ne!(completion_thread, std::thread::current().id());
}

#[test]
fn observer_sees_raw_bytes_before_json_completion() {
    let addr = start_server();
    let (tx, rx) = mpsc::channel();
    let observer_tx = tx.clone();

    let url = Url::parse(&format!("http://{addr}/json")).unwrap();
    xhr_core::json(transport(), url)
        .response(move |response| {
            observer_tx
                .send(format!("raw:{}", String::from_utf8_lossy(&response.body)))
                .unwrap();
        })
        .get(move |result| tx.send(format!("done:{}", result.is_ok())).unwrap());

    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), r#"raw:{"a":1}"#);
    assert_eq!(rx.recv_timeout(RECV_TIMEOUT).unwrap(), "done:true");
}
