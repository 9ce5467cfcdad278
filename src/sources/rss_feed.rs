use async_trait::async_trait;
use chrono::Utc;
use feed_rs::parser;
use tracing::{info, warn};

use crate::fetcher::HttpFetcher;
use crate::traits::{FetchOutcome, SourceAdapter};
use crate::types::{Article, NewsError, Result, RSS_FEED};

/// One statically configured feed endpoint.
#[derive(Debug, Clone)]
pub struct FeedSpec {
    pub name: String,
    pub url: String,
}

impl FeedSpec {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// The reference feed configuration.
pub fn default_feeds() -> Vec<FeedSpec> {
    vec![
        FeedSpec::new("BBC", "http://feeds.bbci.co.uk/news/rss.xml"),
        FeedSpec::new("Reuters", "http://feeds.reuters.com/reuters/topNews"),
        FeedSpec::new("Al Jazeera", "https://www.aljazeera.com/xml/rss/all.xml"),
    ]
}

/// RSS/Atom feed source over a fixed feed list. The feeds are not
/// topic-searchable; the whole feed set is fetched per call, matching the
/// reference behavior. A failing feed never drops the other feeds'
/// entries.
pub struct RssFeedSource {
    fetcher: HttpFetcher,
    feeds: Vec<FeedSpec>,
}

impl RssFeedSource {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            feeds: default_feeds(),
        }
    }

    pub fn with_feeds(mut self, feeds: Vec<FeedSpec>) -> Self {
        self.feeds = feeds;
        self
    }

    async fn fetch_one(&self, feed: &FeedSpec, per_feed_limit: usize) -> Result<Vec<Article>> {
        let content = self.fetcher.get_text(&feed.url).await?;
        let parsed = parser::parse(content.as_bytes())
            .map_err(|e| NewsError::Parse(format!("{}: {}", feed.name, e)))?;

        let fetched_at = Utc::now();
        let articles = parsed
            .entries
            .into_iter()
            .take(per_feed_limit)
            .filter_map(|entry| {
                let title = entry.title.map(|t| t.content);
                let url = entry.links.first().map(|l| l.href.clone());
                let body = entry.summary.map(|s| s.content);
                let published_at = entry.published.unwrap_or(fetched_at);
                Article::from_parts(title, url, body, RSS_FEED, published_at, None)
            })
            .collect();
        Ok(articles)
    }
}

#[async_trait]
impl SourceAdapter for RssFeedSource {
    fn name(&self) -> &'static str {
        RSS_FEED
    }

    /// `limit` is the per-feed entry cap, clamped to 5..=20.
    async fn fetch(&self, _topic: &str, limit: usize) -> FetchOutcome {
        let per_feed_limit = limit.clamp(5, 20);
        let mut articles = Vec::new();
        let mut failures = Vec::new();

        for feed in &self.feeds {
            match self.fetch_one(feed, per_feed_limit).await {
                Ok(entries) => {
                    info!("feed {} contributed {} entries", feed.name, entries.len());
                    articles.extend(entries);
                }
                Err(e) => {
                    warn!("feed {} failed: {}", feed.name, e);
                    failures.push(format!("{}: {}", feed.name, e));
                }
            }
        }

        if failures.is_empty() {
            FetchOutcome::ok(articles)
        } else if articles.is_empty() {
            FetchOutcome::failed(failures.join("; "))
        } else {
            FetchOutcome::partial(articles, failures.join("; "))
        }
    }
}
