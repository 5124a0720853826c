//! HTTP transport.
//!
//! The gateway talks to the provider through the [`Transport`] trait so the
//! HTTP client can be swapped (a shared `reqwest::Client`, a proxy-aware
//! client, or an in-memory double in tests). A transport returns the raw
//! status and body for *every* response it receives, 2xx or not; deciding what
//! a non-2xx status means is the gateway's job.

use crate::errors::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use std::time::Duration;

/// A fully built outgoing request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method (POST or PATCH)
    pub method: Method,

    /// Absolute URL
    pub url: String,

    /// Request headers, including authorization
    pub headers: HeaderMap,

    /// Serialized JSON body
    pub body: String,
}

/// Status and body of a received response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,

    /// Response body as text
    pub body: String,
}

impl RawResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns whatever the server answered.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request.
    ///
    /// Only failures to obtain a response at all (connection, TLS, timeout)
    /// are errors.
    async fn send(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// [`Transport`] backed by `reqwest`.
#[derive(Clone, Debug, Default)]
pub struct HttpTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Creates a transport with a default client and no timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom HTTP client.
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Sets a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers)
            .body(request.body);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
