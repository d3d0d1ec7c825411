//! Outbound page fetching

use super::identity::Headers;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use thiserror::Error;

/// Failure to obtain a page body
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status {
        /// Response status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// No answer within the request timeout
    #[error("request to {0} timed out")]
    Timeout(String),

    /// Connection, TLS or body read failure
    #[error("request failed: {0}")]
    Transport(String),

    /// A header could not be encoded
    #[error("invalid header {0}")]
    InvalidHeader(String),
}

/// Fetches a URL and returns the raw response body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` with `headers`, returning the body of a 2xx response
    async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError>;
}

/// [`PageFetcher`] backed by a shared reqwest client
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// Create a fetcher with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &Headers) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .headers(to_header_map(headers)?)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        response.text().await.map_err(|e| classify(url, e))
    }
}

fn classify(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout(url.to_string())
    } else {
        FetchError::Transport(error.to_string())
    }
}

fn to_header_map(headers: &Headers) -> Result<HeaderMap, FetchError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| FetchError::InvalidHeader(name.clone()))?;
        let value =
            HeaderValue::from_str(value).map_err(|_| FetchError::InvalidHeader(name.to_string()))?;
        map.insert(name, value);
    }
    Ok(map)
}
