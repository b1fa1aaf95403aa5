//! Shared helpers for the HTTP integration tests.

#![allow(dead_code)]

use std::time::Duration;

use whd::{Config, Credentials, WhdClient};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

/// REST path of `resource` on the mock server.
pub fn api(resource: &str) -> String {
    format!("/helpdesk/WebObjects/Helpdesk.woa/ra/{}", resource)
}

/// Client authenticating with [`API_KEY`] against `server`, with near-zero
/// retry backoff.
pub fn client(server: &MockServer) -> WhdClient {
    client_with(server, Credentials::api_key(API_KEY), 2)
}

pub fn client_with(server: &MockServer, credentials: Credentials, retry_max: u32) -> WhdClient {
    let config = Config::new(server.uri(), credentials)
        .unwrap()
        .with_retry_max(retry_max)
        .with_retry_backoff(Duration::from_millis(1));
    WhdClient::new(&config).unwrap()
}
