use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statically known source identifiers. `Article::source` is always one of these.
pub const WEB_SEARCH: &str = "WebSearch";
pub const RSS_FEED: &str = "RSSFeed";
pub const CURATED_API: &str = "CuratedAPI";

pub const ALL_SOURCES: [&str; 3] = [WEB_SEARCH, RSS_FEED, CURATED_API];

/// A normalized news record, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    /// Summary/description text, possibly HTML. May be empty.
    pub body: String,
    /// Adapter identity, not the publisher name from the payload.
    pub source: String,
    /// Best-effort; falls back to the fetch time when the source
    /// provides no usable date.
    pub published_at: DateTime<Utc>,
    /// Resolved lazily by the image resolver; absent until then.
    pub image: Option<String>,
}

impl Article {
    /// Builds a record from raw payload fields, enforcing the boundary
    /// invariant: a record whose title and URL are both empty after
    /// trimming is discarded.
    pub fn from_parts(
        title: Option<String>,
        url: Option<String>,
        body: Option<String>,
        source: &str,
        published_at: DateTime<Utc>,
        image: Option<String>,
    ) -> Option<Self> {
        let title = title.unwrap_or_default().trim().to_string();
        let url = url.unwrap_or_default().trim().to_string();
        if title.is_empty() && url.is_empty() {
            return None;
        }
        Some(Self {
            title,
            url,
            body: body.unwrap_or_default(),
            source: source.to_string(),
            published_at,
            image: image.filter(|i| !i.trim().is_empty()),
        })
    }
}

/// Per-call availability of one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceState {
    Available,
    /// Some records recovered despite a later failure.
    Degraded(String),
    Unavailable(String),
}

impl SourceState {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceState::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStatus {
    pub name: String,
    pub state: SourceState,
}

/// The outcome of one aggregation call. All fields are fresh per call;
/// nothing persists across calls.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    /// Main feed: merged, deduplicated, sorted newest first.
    pub records: Vec<Article>,
    /// Curated-source records, kept as a separate editorial lane.
    pub featured: Vec<Article>,
    /// Exactly one entry per enabled source.
    pub statuses: BTreeMap<String, SourceStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("{0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, NewsError>;
