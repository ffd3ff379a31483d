//! Real HTTP transport implementation
//!
//! Sends requests with a shared reqwest client.

use std::time::Duration;

use contracts::{DispatcherSettings, HttpMethod};
use reqwest::{Client, Method};
use tracing::{debug, instrument, warn};

use crate::client::{HttpTransport, TransportRequest, TransportResponse};
use crate::error::{Result, TransportError};

/// Real HTTP transport
///
/// Wraps a `reqwest::Client`; cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a transport with the given timeout and user agent
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| TransportError::Client {
                message: e.to_string(),
            })?;

        Ok(Self { client })
    }

    /// Build from dispatcher settings
    pub fn from_settings(settings: &DispatcherSettings) -> Result<Self> {
        Self::new(
            Duration::from_secs(settings.request_timeout_secs),
            &settings.user_agent,
        )
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

fn classify(error: reqwest::Error) -> TransportError {
    let message = error.to_string();
    if error.is_timeout() {
        TransportError::Timeout { message }
    } else if error.is_connect() {
        TransportError::Connect { message }
    } else if error.is_body() || error.is_decode() {
        TransportError::Body { message }
    } else {
        TransportError::Request { message }
    }
}

impl HttpTransport for ReqwestTransport {
    fn name(&self) -> &str {
        "reqwest"
    }

    #[instrument(
        name = "reqwest_transport_send",
        skip(self, request),
        fields(method = %request.method, url = %request.url, body_len = request.body.len())
    )]
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.body(request.body).send().await.map_err(|e| {
            warn!(error = %e, "HTTP request failed");
            classify(e)
        })?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(classify)?;

        debug!(status, body_len = body.len(), "HTTP response received");

        Ok(TransportResponse { status, body })
    }
}
