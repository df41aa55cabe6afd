//! `reqwest`-backed [`RideSource`].
//!
//! One GET per call, no retries. The body is read as text first and then
//! parsed, so a decode failure can log what the server actually sent.

use async_trait::async_trait;
use ride_insights_source_models::Endpoint;

use crate::{ClientConfig, ConfigError, FetchError, RawPayload, RideSource};

/// Maximum length of the response body preview included in error messages.
const BODY_PREVIEW_LEN: usize = 200;

/// Fetches analytics payloads over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRideSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRideSource {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Client`] if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for `endpoint`.
    #[must_use]
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        endpoint_url(&self.base_url, endpoint)
    }
}

#[async_trait]
impl RideSource for HttpRideSource {
    async fn fetch(&self, endpoint: Endpoint) -> Result<RawPayload, FetchError> {
        let url = self.url_for(endpoint);
        log::debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        check_status(endpoint, response.status())?;

        let text = response
            .text()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        parse_body(endpoint, &text)
    }
}

fn endpoint_url(base_url: &str, endpoint: Endpoint) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint.path())
}

/// Maps any non-2xx status to [`FetchError::Server`].
fn check_status(endpoint: Endpoint, status: reqwest::StatusCode) -> Result<(), FetchError> {
    if status.is_success() {
        return Ok(());
    }
    log::warn!("[{endpoint}] HTTP {status}");
    Err(FetchError::Server {
        endpoint,
        status: status.as_u16(),
    })
}

fn parse_body(endpoint: Endpoint, text: &str) -> Result<RawPayload, FetchError> {
    serde_json::from_str(text).map_err(|e| {
        let preview: String = text.chars().take(BODY_PREVIEW_LEN).collect();
        log::warn!(
            "[{endpoint}] JSON parse failed: {e}\n  \
             received: {} bytes\n  \
             body preview: {preview}",
            text.len(),
        );
        FetchError::Malformed {
            endpoint,
            message: format!("{e} (received {} bytes)", text.len()),
        }
    })
}
