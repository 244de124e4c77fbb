//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agolapi::{AgolaClient, AgolaError, Transport};
use async_trait::async_trait;

/// Token used by every test client.
pub const TEST_TOKEN: &str = "test-token";

/// Create a client pointed at a wiremock server.
pub fn client_for(server: &wiremock::MockServer) -> AgolaClient {
    AgolaClient::new(&server.uri(), TEST_TOKEN).expect("Failed to create client")
}

/// Transport that counts the requests it sends.
#[derive(Clone, Default)]
pub struct CountingTransport {
    inner: reqwest::Client,
    calls: Arc<AtomicUsize>,
}

impl CountingTransport {
    /// Number of requests sent so far, across clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for CountingTransport {
    async fn execute(&self, request: reqwest::Request) -> agolapi::Result<reqwest::Response> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        reqwest::Client::execute(&self.inner, request)
            .await
            .map_err(AgolaError::Http)
    }
}

/// Run the CLI binary against `gateway_url`.
pub fn run_cli(gateway_url: &str, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agolapi"));
    cmd.args(args);
    cmd.env("AGOLA_GATEWAY_URL", gateway_url);
    cmd.env("AGOLA_TOKEN", TEST_TOKEN);
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success, returning stdout.
pub fn run_cli_success(gateway_url: &str, args: &[&str]) -> String {
    let output = run_cli(gateway_url, args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}
