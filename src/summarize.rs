use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fetcher::HttpFetcher;
use crate::types::{NewsError, Result};

const DEFAULT_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct SummarizeResponse {
    summary_text: String,
}

/// Opaque call-out to an external summarization service. One synchronous
/// request per invocation, no retry, no caching; the caller decides what
/// to do with a failure.
pub struct SummarizationClient {
    fetcher: HttpFetcher,
    endpoint: String,
    token: String,
}

impl SummarizationClient {
    pub fn new(fetcher: HttpFetcher, token: impl Into<String>) -> Self {
        Self {
            fetcher,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            token: token.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn summarize(&self, text: &str) -> Result<String> {
        debug!("summarizing {} bytes of text", text.len());
        let response = self
            .fetcher
            .client()
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&SummarizeRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NewsError::Status {
                status: status.as_u16(),
                detail,
            });
        }

        let summaries: Vec<SummarizeResponse> = response.json().await?;
        summaries
            .into_iter()
            .next()
            .map(|s| s.summary_text)
            .ok_or_else(|| NewsError::Parse("empty summarization response".to_string()))
    }
}
