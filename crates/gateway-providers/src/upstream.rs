//! Outbound call plumbing.
//!
//! An [`UpstreamCall`] is built per request by a provider adapter and handed to
//! an [`UpstreamTransport`] exactly once. The transport is the only piece that
//! touches the network; tests substitute their own.

use async_trait::async_trait;
use bytes::Bytes;
use gateway_telemetry::redact_secrets;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use std::fmt;

/// A fully-built provider request
#[derive(Debug, Clone)]
pub struct UpstreamCall {
    /// Target URL (never carries credentials)
    pub url: String,
    /// HTTP method
    pub method: Method,
    /// Request headers; credential headers are marked sensitive
    pub headers: HeaderMap,
    /// JSON body
    pub body: Value,
}

impl UpstreamCall {
    /// Create a JSON POST call
    pub fn post(url: impl Into<String>, headers: HeaderMap, body: Value) -> Self {
        Self {
            url: url.into(),
            method: Method::POST,
            headers,
            body,
        }
    }
}

/// Raw provider answer
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

impl UpstreamReply {
    /// Create a new reply
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is 2xx
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Status line for messages, e.g. `503 Service Unavailable`
    #[must_use]
    pub fn status_line(&self) -> String {
        match StatusCode::from_u16(self.status)
            .ok()
            .and_then(|s| s.canonical_reason())
        {
            Some(reason) => format!("{} {reason}", self.status),
            None => self.status.to_string(),
        }
    }
}

/// Transport failure before any HTTP status was received
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// HTTP client could not be built
    #[error("failed to create HTTP client: {0}")]
    Client(String),
    /// Connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request timed out
    #[error("request timed out: {0}")]
    Timeout(String),
    /// Any other send/receive failure
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        let message = redact_secrets(&e.to_string()).into_owned();
        if e.is_timeout() {
            Self::Timeout(message)
        } else if e.is_connect() {
            Self::Connect(message)
        } else {
            Self::Request(message)
        }
    }
}

/// Executes one upstream call
#[async_trait]
pub trait UpstreamTransport: Send + Sync {
    /// Send the call and collect the full response body.
    ///
    /// Non-2xx statuses are returned as replies, not errors.
    async fn execute(&self, call: UpstreamCall) -> Result<UpstreamReply, TransportError>;
}

/// reqwest-backed transport.
///
/// No timeout is configured: a slow provider holds the request for as long as
/// the client waits.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Create a transport with a pooled client
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .pool_max_idle_per_host(32)
            .user_agent(concat!("chat-gateway/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

#[async_trait]
impl UpstreamTransport for HttpTransport {
    async fn execute(&self, call: UpstreamCall) -> Result<UpstreamReply, TransportError> {
        let response = self
            .client
            .request(call.method, &call.url)
            .headers(call.headers)
            .json(&call.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok(UpstreamReply::new(status, body))
    }
}
