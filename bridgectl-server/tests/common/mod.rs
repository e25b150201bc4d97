//! Common test utilities for CLI integration tests.
//!
//! Provides:
//! - A handle that runs the `bridgectl` binary on a free local port
//! - A blocking HTTP client for talking to it
//! - Command builder helpers

use std::net::{Ipv4Addr, SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use assert_cmd::cargo::cargo_bin;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use reqwest::Method;

/// Get a bare command builder for the bridgectl binary.
#[allow(dead_code)]
pub fn command() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("bridgectl").expect("Failed to find bridgectl binary")
}

/// Picks a loopback address that was free a moment ago.
#[allow(dead_code)]
pub fn free_local_addr() -> SocketAddr {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).expect("bind ephemeral port");
    listener.local_addr().expect("local address")
}

/// Status, headers and body of a response from the server.
#[allow(dead_code)]
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: String,
}

#[allow(dead_code)]
impl HttpResponse {
    /// Returns the header named `name` as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A running `bridgectl` process, killed on drop.
#[allow(dead_code)]
pub struct TestServer {
    child: Child,
    client: Client,
    pub addr: SocketAddr,
}

#[allow(dead_code)]
impl TestServer {
    /// Starts the server on a free loopback port with extra arguments.
    ///
    /// # Panics
    /// Panics if the server does not accept connections within five seconds.
    pub fn start(extra_args: &[&str]) -> Self {
        let addr = free_local_addr();
        let child = Command::new(cargo_bin("bridgectl"))
            .arg("--listen")
            .arg(addr.to_string())
            .args(extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .expect("Failed to start bridgectl");

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .no_proxy()
            .build()
            .expect("Failed to build HTTP client");

        let mut server = Self {
            child,
            client,
            addr,
        };
        server.wait_until_ready();
        server
    }

    fn wait_until_ready(&mut self) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if TcpStream::connect(self.addr).is_ok() {
                return;
            }
            if let Ok(Some(status)) = self.child.try_wait() {
                panic!("bridgectl exited early with {status}");
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("bridgectl did not start listening on {}", self.addr);
    }

    /// Sends `method path` and reads the whole response.
    pub fn request(&self, method: &str, path: &str) -> HttpResponse {
        let method = Method::from_bytes(method.as_bytes()).expect("valid HTTP method");
        let response = self
            .client
            .request(method, format!("http://{}{path}", self.addr))
            .send()
            .expect("request to bridgectl");

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().expect("readable body");

        HttpResponse {
            status,
            headers,
            body,
        }
    }

    /// Shorthand for a GET request.
    pub fn get(&self, path: &str) -> HttpResponse {
        self.request("GET", path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
