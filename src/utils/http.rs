//! HTTP client utilities.

use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::download::{DownloadError, Fetcher};

/// Shared HTTP client with sensible defaults
///
/// Holds a verifying client and a second one that skips certificate checks,
/// so TLS can be bypassed per request without rebuilding either.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Arc<Client>,
    insecure: Arc<Client>,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::with_timeout(Duration::from_secs(60))
    }

    /// Create a new HTTP client with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(
            concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")),
            timeout,
        )
    }

    /// Create a new HTTP client with a custom user agent
    pub fn with_user_agent(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let builder = || {
            Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .pool_idle_timeout(Duration::from_secs(90))
        };

        let client = builder().build()?;
        let insecure = builder().danger_accept_invalid_certs(true).build()?;

        Ok(Self {
            client: Arc::new(client),
            insecure: Arc::new(insecure),
        })
    }

    /// Get the verifying client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the client to use for a request
    pub fn client_for(&self, ignore_tls: bool) -> &Client {
        if ignore_tls {
            &self.insecure
        } else {
            &self.client
        }
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, url: &str, ignore_tls: bool) -> Result<Vec<u8>, DownloadError> {
        let response = self
            .client_for(ignore_tls)
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let bytes = response.bytes().await?;
        tracing::debug!("fetched {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
