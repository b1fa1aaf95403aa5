//! HTTP client for the Web Help Desk REST API.
//!
//! This module provides the `WhdClient` struct and the transport it shares
//! across the resource families in its submodules:
//!
//! - [`session`] - session keys
//! - [`tickets`] - tickets
//! - [`notes`] - ticket notes
//! - [`attachments`] - attachment download and upload
//! - [`assets`] - assets
//! - [`resources`] - locations and reference lists
//!
//! # Retry Logic
//!
//! Every request is retried on transient failures (429, 5xx other than 501,
//! timeouts, connection errors) up to `retry_max` times, with exponential
//! backoff capped at 30 seconds. A `Retry-After` header on 429 responses is
//! honoured. Other client errors are returned immediately.
//!
//! # Security
//!
//! Credentials travel as query parameters, so transport errors are stripped
//! of their URL and response bodies are sanitized before they are stored in
//! an error. Credentials are never logged.

mod assets;
mod attachments;
mod notes;
mod resources;
mod session;
mod tickets;

use std::future::Future;
use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::Credentials;
use crate::config::Config;
use crate::error::WhdError;

/// Path of the REST API below the server root.
pub const API_PATH: &str = "/helpdesk/WebObjects/Helpdesk.woa/ra/";

/// Timeout for single-record reads.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for note creation.
const NOTE_TIMEOUT: Duration = Duration::from_secs(60);

/// Timeout for writes, ticket searches and note listings.
const WRITE_TIMEOUT: Duration = Duration::from_secs(90);

/// Timeout for paginated lists and attachment transfers.
const BULK_TIMEOUT: Duration = Duration::from_secs(120);

/// Upper bound for the delay between retries.
const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// HTTP client for Web Help Desk.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Example
///
/// ```ignore
/// let config = Config::from_env()?;
/// let client = WhdClient::new(&config)?;
///
/// let ticket = client.get_ticket(1234).await?;
/// ```
#[derive(Clone)]
pub struct WhdClient {
    /// The underlying HTTP client.
    http: Client,

    /// Server root without trailing slash.
    base_url: String,

    /// How requests authenticate.
    /// SECURITY: Never log the secret part!
    credentials: Credentials,

    /// Whether TLS certificates are verified.
    ssl_verify: bool,

    /// Retries after the first attempt.
    retry_max: u32,

    /// Initial delay between retries.
    retry_backoff: Duration,
}

impl WhdClient {
    /// Creates a new client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `WhdError::HttpClient` if the HTTP client fails to initialize.
    pub fn new(config: &Config) -> Result<Self, WhdError> {
        let http = Self::http_builder(config.ssl_verify)
            .build()
            .map_err(WhdError::HttpClient)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials.clone(),
            ssl_verify: config.ssl_verify,
            retry_max: config.retry_max,
            retry_backoff: config.retry_backoff,
        })
    }

    /// Shared builder settings for every HTTP client the crate creates.
    fn http_builder(ssl_verify: bool) -> ClientBuilder {
        Client::builder()
            .danger_accept_invalid_certs(!ssl_verify)
            .user_agent(concat!("whd/", env!("CARGO_PKG_VERSION")))
    }

    /// Returns the server root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns a clone of this client that authenticates with `credentials`.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self {
            credentials,
            ..self.clone()
        }
    }

    /// Returns the error message with every credential secret redacted.
    pub fn sanitize_error(&self, error: &WhdError) -> String {
        error.sanitized_display(&[self.credentials.secret()])
    }

    /// Tests connectivity and credentials with a cheap authenticated call.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the server could not be used.
    pub async fn test_connection(&self) -> Result<(), WhdError> {
        tracing::debug!("Testing connection to Web Help Desk");

        let query = [("limit", "1".to_string()), ("page", "1".to_string())];
        let result: Result<Vec<Value>, WhdError> =
            self.get_json("PriorityTypes", &query, READ_TIMEOUT).await;

        match result {
            Ok(_) => {
                tracing::info!("Connection test successful");
                Ok(())
            }
            Err(WhdError::Authentication) => Err(WhdError::session(
                "authentication failed - verify the configured WHD credentials",
            )),
            Err(e) => Err(WhdError::session(format!(
                "connection test failed: {} - verify WHD_BASE_URL is correct",
                self.sanitize_error(&e)
            ))),
        }
    }

    /// Full URL for a REST resource (e.g., `Ticket/12`).
    fn api_url(&self, resource: &str) -> String {
        format!("{}{}{}", self.base_url, API_PATH, resource)
    }

    /// Starts an authenticated request on `http`.
    fn authed_with(&self, http: &Client, method: Method, url: &str) -> RequestBuilder {
        http.request(method, url).query(&self.credentials.query_pairs())
    }

    /// Starts an authenticated request on the shared client.
    fn authed(&self, method: Method, url: &str) -> RequestBuilder {
        self.authed_with(&self.http, method, url)
    }

    /// Executes an operation with retry logic for transient failures.
    async fn with_retry<T, F, Fut>(&self, operation: &str, f: F) -> Result<T, WhdError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, WhdError>>,
    {
        let mut delay = self.retry_backoff;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            match f().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempts <= self.retry_max => {
                    let actual_delay = e.retry_after().unwrap_or(delay).min(MAX_BACKOFF);

                    tracing::warn!(
                        operation = operation,
                        attempt = attempts,
                        max_retries = self.retry_max,
                        delay_ms = actual_delay.as_millis() as u64,
                        error = %self.sanitize_error(&e),
                        "Retrying after transient error"
                    );

                    tokio::time::sleep(actual_delay).await;
                    delay = delay.saturating_mul(2).min(MAX_BACKOFF);
                }
                Err(e) => {
                    if attempts > 1 {
                        tracing::debug!(
                            operation = operation,
                            attempts = attempts,
                            "All retry attempts exhausted"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }

    /// Sends a request built by `build`, retrying transient failures, and
    /// returns the raw body of the successful response.
    ///
    /// `build` is called once per attempt.
    async fn execute<F>(
        &self,
        operation: &str,
        timeout: Duration,
        build: F,
    ) -> Result<Vec<u8>, WhdError>
    where
        F: Fn() -> RequestBuilder,
    {
        let (_, body) = self.execute_with_headers(operation, timeout, build).await?;
        Ok(body)
    }

    /// Like [`execute`](Self::execute), but also returns the response headers.
    async fn execute_with_headers<F>(
        &self,
        operation: &str,
        timeout: Duration,
        build: F,
    ) -> Result<(HeaderMap, Vec<u8>), WhdError>
    where
        F: Fn() -> RequestBuilder,
    {
        self.with_retry(operation, || self.execute_once(operation, timeout, build()))
            .await
    }

    /// Sends a single request without retry.
    async fn execute_once(
        &self,
        operation: &str,
        timeout: Duration,
        request: RequestBuilder,
    ) -> Result<(HeaderMap, Vec<u8>), WhdError> {
        tracing::debug!(operation = %operation, "Making WHD API request");

        let response = request.timeout(timeout).send().await.map_err(|e| {
            if e.is_timeout() {
                return WhdError::timeout(timeout, operation);
            }
            // The URL carries credentials in its query string.
            WhdError::Http(e.without_url())
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.handle_http_error(status, response, operation).await);
        }

        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| WhdError::Http(e.without_url()))?;

        Ok((headers, body.to_vec()))
    }

    /// Handles HTTP-level errors and converts to WhdError.
    async fn handle_http_error(
        &self,
        status: StatusCode,
        response: reqwest::Response,
        operation: &str,
    ) -> WhdError {
        let retry_after = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs);

        let raw = response.text().await.unwrap_or_default();
        let body = WhdError::clip_body(&raw, &[self.credentials.secret()]);

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => WhdError::Authentication,
            StatusCode::NOT_FOUND => WhdError::not_found(operation),
            StatusCode::TOO_MANY_REQUESTS => {
                tracing::warn!("Rate limited by WHD server");
                WhdError::RateLimited { retry_after }
            }
            StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT => {
                tracing::warn!(status = %status, "WHD server temporarily unavailable");
                WhdError::ServiceUnavailable { status }
            }
            s if s.is_client_error() => match reason_of(&body) {
                Some(reason) => WhdError::rejected(reason),
                None => WhdError::HttpStatus { status, body },
            },
            _ => WhdError::HttpStatus { status, body },
        }
    }

    /// Parses a JSON response body.
    fn decode<T: DeserializeOwned>(&self, body: &[u8]) -> Result<T, WhdError> {
        serde_json::from_slice(body).map_err(|source| {
            let body = WhdError::clip_body(
                &String::from_utf8_lossy(body),
                &[self.credentials.secret()],
            );
            tracing::debug!(error = %source, body = %body, "Invalid JSON from WHD");
            WhdError::Decode { source, body }
        })
    }

    /// GETs a REST resource and parses the JSON response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, WhdError> {
        let url = self.api_url(resource);
        let operation = format!("GET {}", resource);

        let body = self
            .execute(&operation, timeout, || self.authed(Method::GET, &url).query(query))
            .await?;

        self.decode(&body)
    }

    /// Sends a JSON body to a REST resource and parses the JSON response.
    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        resource: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<T, WhdError> {
        let url = self.api_url(resource);
        let operation = format!("{} {}", method, resource);

        tracing::debug!(operation = %operation, payload = %payload, "JSON sent to WHD");

        let body = self
            .execute(&operation, timeout, || {
                self.authed(method.clone(), &url).json(payload)
            })
            .await?;

        self.decode(&body)
    }

    /// Creates (`POST create_resource`) or updates (`PUT update_resource/{id}`)
    /// a record and returns its id.
    async fn save_entity(
        &self,
        create_resource: &str,
        update_resource: &str,
        id: Option<u64>,
        payload: &Value,
    ) -> Result<u64, WhdError> {
        let response: Value = match id.filter(|id| *id != 0) {
            None => {
                self.send_json(Method::POST, create_resource, payload, WRITE_TIMEOUT)
                    .await?
            }
            Some(id) => {
                let resource = format!("{}/{}", update_resource, id);
                self.send_json(Method::PUT, &resource, payload, WRITE_TIMEOUT)
                    .await?
            }
        };

        id_from_response(&response, create_resource)
    }

    /// Fetches every page of a list resource.
    ///
    /// Pages of `limit` items are requested until one comes back shorter.
    async fn fetch_all_pages<T: DeserializeOwned>(
        &self,
        resource: &str,
        limit: u32,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>, WhdError> {
        let limit = limit.max(1);
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::debug!(resource = %resource, limit, page, "Fetching list page");

            let mut query = vec![("limit", limit.to_string()), ("page", page.to_string())];
            query.extend(params.iter().map(|(k, v)| (*k, v.to_string())));

            let batch: Vec<T> = self.get_json(resource, &query, BULK_TIMEOUT).await?;
            let count = batch.len();
            items.extend(batch);

            if count != limit as usize {
                return Ok(items);
            }
            page += 1;
        }
    }
}

/// Returns the `reason` string of a JSON error body, if there is one.
fn reason_of(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("reason")?
        .as_str()
        .filter(|r| !r.is_empty())
        .map(str::to_string)
}

/// Extracts the record id from a create/update response.
fn id_from_response(response: &Value, what: &str) -> Result<u64, WhdError> {
    if let Some(reason) = response
        .get("reason")
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
    {
        return Err(WhdError::rejected(reason));
    }

    response
        .get("id")
        .and_then(|id| id.as_u64().or_else(|| id.as_f64().map(|f| f as u64)))
        .ok_or_else(|| WhdError::invalid_response(format!("{} response has no id", what)))
}
