//! Outbound HTTP Fetching
//!
//! A narrow `GET url -> (status, body)` interface so callers can be tested
//! without the network, plus the reqwest-backed implementation used in
//! production.

use std::time::Duration;

use thiserror::Error;

/// User-Agent sent with every outbound request
const USER_AGENT: &str = concat!("link-vault/", env!("CARGO_PKG_VERSION"));

/// A fetched page
///
/// `body` is only read for 2xx responses; for any other status it is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures (no HTTP status was obtained)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request timed out")]
    Timeout,

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_builder() {
            TransportError::InvalidUrl(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

/// Outbound GET
#[trait_variant::make(HttpFetcher: Send)]
pub trait LocalHttpFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, TransportError>;
}

/// reqwest-backed fetcher with a total time budget and a body size cap
///
/// Redirects follow reqwest's default policy (up to 10 hops).
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    max_body_bytes: usize,
}

impl ReqwestFetcher {
    /// ## Arguments
    /// * `timeout` - total budget covering connect, headers and body
    /// * `max_body_bytes` - bytes past this are discarded
    pub fn new(timeout: Duration, max_body_bytes: usize) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Request(format!("http client error: {e}")))?;

        Ok(Self {
            client,
            max_body_bytes,
        })
    }
}

impl HttpFetcher for ReqwestFetcher {
    async fn get(&self, url: &str) -> Result<FetchedPage, TransportError> {
        let mut response = self.client.get(url).send().await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            return Ok(FetchedPage {
                status,
                body: String::new(),
            });
        }

        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if append_capped(&mut body, &chunk, self.max_body_bytes) {
                tracing::debug!(
                    url,
                    max_body_bytes = self.max_body_bytes,
                    "Response body truncated"
                );
                break;
            }
        }

        Ok(FetchedPage {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        })
    }
}

/// Appends `chunk` up to `max` total bytes; true when bytes were dropped
fn append_capped(body: &mut Vec<u8>, chunk: &[u8], max: usize) -> bool {
    let remaining = max.saturating_sub(body.len());
    if chunk.len() > remaining {
        body.extend_from_slice(&chunk[..remaining]);
        return true;
    }
    body.extend_from_slice(chunk);
    false
}
