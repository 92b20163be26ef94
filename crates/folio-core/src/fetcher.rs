use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info};

use crate::config::FetchConfig;
use crate::{Error, Result};

/// HTTP client for fetching remote documents.
///
/// The whole request (connect, headers, body) is bounded by one timeout. The
/// request future is also wrapped in [`tokio::time::timeout`], so expiry drops
/// the in-flight request instead of leaving it running.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher from the `[fetch]` configuration section.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Self::build(config.timeout(), &config.user_agent)
    }

    /// Creates a fetcher with a custom timeout (primarily for tests)
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(timeout, &FetchConfig::default().user_agent)
    }

    fn build(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn timeout_error(&self, url: &str) -> Error {
        Error::FetchTimeout {
            url: url.to_string(),
            timeout_secs: self.timeout.as_secs(),
        }
    }

    fn transport_error(&self, url: &str, err: &reqwest::Error) -> Error {
        if err.is_timeout() {
            self.timeout_error(url)
        } else {
            Error::FetchFailed {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }

    /// Fetches `url` and returns the response body.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let request = async {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| self.transport_error(url, &e))?;

            let status = response.status();
            if !status.is_success() {
                return Err(Error::FetchFailed {
                    url: url.to_string(),
                    reason: format!("HTTP {status}"),
                });
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| self.transport_error(url, &e))?;
            Ok::<_, Error>(body.to_vec())
        };

        debug!(url, timeout_ms = self.timeout.as_millis(), "fetching");
        let bytes = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| self.timeout_error(url))??;

        info!(url, bytes = bytes.len(), "fetched remote document");
        Ok(bytes)
    }
}
