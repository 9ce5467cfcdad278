use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use crate::types::{NewsError, Result};

/// HTTP settings shared by every outbound request.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "NewsHub/1.0".to_string(),
            timeout_seconds: 10,
            max_redirects: 5,
        }
    }
}

/// Thin wrapper around a shared `reqwest::Client`. Cheap to clone; adapters
/// hold their own copy and never mutate it.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// GET a URL and return the response body as text. Non-2xx responses
    /// map to `NewsError::Status` carrying the status detail.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }
        Ok(response.text().await?)
    }

    /// GET a URL with a bounded timeout that overrides the client default.
    /// Used by best-effort lookups that must not hold up their caller.
    pub async fn get_text_within(&self, url: &str, budget: Duration) -> Result<String> {
        debug!("GET {} (budget {:?})", url, budget);
        let response = self.client.get(url).timeout(budget).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(NewsError::Status {
                status: status.as_u16(),
                detail: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        // The builder only fails on TLS backend misconfiguration, which is
        // unrecoverable at startup anyway.
        Self::new(FetchConfig::default()).expect("failed to build HTTP client")
    }
}
