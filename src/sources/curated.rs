use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use crate::fetcher::HttpFetcher;
use crate::traits::{FetchOutcome, Lane, SourceAdapter};
use crate::types::{Article, CURATED_API};

const DEFAULT_BASE_URL: &str = "https://gnews.io";

#[derive(Debug, Deserialize)]
struct CuratedResponse {
    #[serde(default)]
    articles: Vec<CuratedArticle>,
}

#[derive(Debug, Deserialize)]
struct CuratedArticle {
    title: Option<String>,
    url: Option<String>,
    image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
    description: Option<String>,
}

/// Keyed curated news API feeding the featured lane. A missing key means
/// the source is disabled for the call, not failed.
pub struct CuratedApiSource {
    fetcher: HttpFetcher,
    api_key: Option<String>,
    base_url: String,
}

impl CuratedApiSource {
    pub fn new(fetcher: HttpFetcher, api_key: Option<String>) -> Self {
        Self {
            fetcher,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl SourceAdapter for CuratedApiSource {
    fn name(&self) -> &'static str {
        CURATED_API
    }

    fn lane(&self) -> Lane {
        Lane::Featured
    }

    async fn fetch(&self, topic: &str, limit: usize) -> FetchOutcome {
        let Some(key) = self.api_key.as_deref() else {
            info!("curated source has no API key, treating as disabled");
            return FetchOutcome::failed("disabled");
        };

        let query: String = url::form_urlencoded::byte_serialize(topic.as_bytes()).collect();
        let url = format!(
            "{}/api/v4/search?q={}&lang=en&max={}&sortby=publishedAt&token={}",
            self.base_url.trim_end_matches('/'),
            query,
            limit,
            key
        );

        let body = match self.fetcher.get_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("curated API failed for '{}': {}", topic, e);
                return FetchOutcome::failed(format!("featured articles unavailable: {}", e));
            }
        };

        let response: CuratedResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => return FetchOutcome::failed(format!("malformed curated payload: {}", e)),
        };

        let fetched_at = Utc::now();
        let articles: Vec<Article> = response
            .articles
            .into_iter()
            .take(limit)
            .filter_map(|item| {
                let published_at = item
                    .published_at
                    .as_deref()
                    .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or(fetched_at);
                Article::from_parts(
                    item.title,
                    item.url,
                    item.description,
                    CURATED_API,
                    published_at,
                    item.image,
                )
            })
            .collect();

        info!("curated API returned {} articles for '{}'", articles.len(), topic);
        FetchOutcome::ok(articles)
    }
}
