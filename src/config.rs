use std::env;
use std::time::Duration;

use crate::types::ALL_SOURCES;

/// Process-wide configuration, read once at startup and immutable afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the curated news API. Absent means the curated
    /// source is disabled, not failed.
    pub curated_api_key: Option<String>,
    /// Credential for the summarization endpoint.
    pub summarizer_token: Option<String>,
    /// Sources enabled by default for each aggregation call.
    pub enabled_sources: Vec<String>,
    pub page_size: usize,
    /// Web-search result cap (the source's natural limit is 30).
    pub web_search_limit: usize,
    /// Per-feed entry cap for the RSS source, clamped to 5..=20.
    pub rss_per_feed_limit: usize,
    /// Result cap for the curated/featured lane.
    pub curated_limit: usize,
    /// Independent timeout budget for each source fetch task.
    pub source_timeout: Duration,
    /// Optional deadline for the whole aggregation call.
    pub overall_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            curated_api_key: None,
            summarizer_token: None,
            enabled_sources: ALL_SOURCES.iter().map(|s| s.to_string()).collect(),
            page_size: 8,
            web_search_limit: 20,
            rss_per_feed_limit: 15,
            curated_limit: 5,
            source_timeout: Duration::from_secs(10),
            overall_timeout: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment (and a `.env` file when
    /// present). Unset or unparseable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let enabled_sources = env::var("NEWSHUB_SOURCES")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.enabled_sources);

        Self {
            curated_api_key: env::var("GNEWS_KEY").ok().filter(|k| !k.is_empty()),
            summarizer_token: env::var("HF_TOKEN").ok().filter(|k| !k.is_empty()),
            enabled_sources,
            page_size: parse_env("NEWSHUB_PAGE_SIZE", defaults.page_size).max(1),
            web_search_limit: parse_env("NEWSHUB_WEB_SEARCH_LIMIT", defaults.web_search_limit),
            rss_per_feed_limit: parse_env("NEWSHUB_RSS_PER_FEED_LIMIT", defaults.rss_per_feed_limit)
                .clamp(5, 20),
            curated_limit: parse_env("NEWSHUB_CURATED_LIMIT", defaults.curated_limit),
            source_timeout: Duration::from_secs(parse_env("NEWSHUB_SOURCE_TIMEOUT_SECS", 10)),
            overall_timeout: env::var("NEWSHUB_OVERALL_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
