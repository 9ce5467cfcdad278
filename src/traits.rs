use async_trait::async_trait;

use crate::types::Article;

/// Which result lane an adapter's records land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    /// Merged, deduplicated main feed.
    Main,
    /// Curated editorial lane, never merged into the main feed.
    Featured,
}

/// What one source contributed to an aggregation call. Records parsed
/// before a failure are kept alongside the failure reason, so partial
/// success is never discarded.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub articles: Vec<Article>,
    pub error: Option<String>,
}

impl FetchOutcome {
    pub fn ok(articles: Vec<Article>) -> Self {
        Self {
            articles,
            error: None,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            error: Some(reason.into()),
        }
    }

    pub fn partial(articles: Vec<Article>, reason: impl Into<String>) -> Self {
        Self {
            articles,
            error: Some(reason.into()),
        }
    }
}

/// One external provider of articles. Implementations translate the
/// source's native payload into `Article` records and must not touch any
/// shared mutable state; their only side effect is the outbound request.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Static source identifier, used as `Article::source` and as the
    /// key in the aggregation status map.
    fn name(&self) -> &'static str;

    fn lane(&self) -> Lane {
        Lane::Main
    }

    /// Fetch up to `limit` records for `topic`. Failures are reported in
    /// the outcome, never as a panic or an early abort of the call.
    async fn fetch(&self, topic: &str, limit: usize) -> FetchOutcome;
}
