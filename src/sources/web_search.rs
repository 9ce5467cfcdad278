use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, warn};

use crate::fetcher::HttpFetcher;
use crate::traits::{FetchOutcome, SourceAdapter};
use crate::types::{Article, WEB_SEARCH};

/// The search engine's natural result ceiling.
const MAX_RESULTS: usize = 30;

const DEFAULT_BASE_URL: &str = "https://search.newshub.dev";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: Option<String>,
    href: Option<String>,
    body: Option<String>,
}

/// Keyword-search source. The engine provides no reliable publication
/// date, so records carry the fetch time; undated hits therefore sort as
/// most recent. That is a stated data-quality tradeoff, not a bug.
pub struct WebSearchSource {
    fetcher: HttpFetcher,
    base_url: String,
}

impl WebSearchSource {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn query_url(&self, topic: &str, limit: usize) -> String {
        let mut url = format!("{}/search", self.base_url.trim_end_matches('/'));
        url.push_str(&format!(
            "?q={}&max_results={}",
            urlencode(topic),
            limit.min(MAX_RESULTS)
        ));
        url
    }
}

#[async_trait]
impl SourceAdapter for WebSearchSource {
    fn name(&self) -> &'static str {
        WEB_SEARCH
    }

    async fn fetch(&self, topic: &str, limit: usize) -> FetchOutcome {
        let url = self.query_url(topic, limit);
        let body = match self.fetcher.get_text(&url).await {
            Ok(body) => body,
            Err(e) => {
                warn!("web search failed for '{}': {}", topic, e);
                return FetchOutcome::failed(format!("search failed: {}", e));
            }
        };

        let response: SearchResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => return FetchOutcome::failed(format!("malformed search payload: {}", e)),
        };

        let fetched_at = Utc::now();
        let articles: Vec<Article> = response
            .results
            .into_iter()
            .take(limit.min(MAX_RESULTS))
            .filter_map(|hit| {
                Article::from_parts(
                    hit.title,
                    hit.href,
                    hit.body,
                    WEB_SEARCH,
                    fetched_at,
                    None,
                )
            })
            .collect();

        info!("web search returned {} results for '{}'", articles.len(), topic);
        FetchOutcome::ok(articles)
    }
}

fn urlencode(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes()).collect()
}
