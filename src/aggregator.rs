use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{timeout, Instant};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::fetcher::{FetchConfig, HttpFetcher};
use crate::sources::{CuratedApiSource, RssFeedSource, WebSearchSource};
use crate::traits::{FetchOutcome, Lane, SourceAdapter};
use crate::types::{AggregationResult, Article, Result, SourceState, SourceStatus};

struct SourceEntry {
    adapter: Arc<dyn SourceAdapter>,
    limit: usize,
}

/// Fans one aggregation call out into one fetch task per enabled source,
/// joins them, and folds the outcomes into a merged, deduplicated,
/// deterministically ordered result. A failing or disabled source never
/// aborts the call; it is reported through the status map instead.
pub struct NewsAggregator {
    sources: Vec<SourceEntry>,
    source_timeout: Duration,
    overall_timeout: Option<Duration>,
}

impl NewsAggregator {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            source_timeout: Duration::from_secs(10),
            overall_timeout: None,
        }
    }

    /// Wires up the three production adapters from process configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(FetchConfig {
            timeout_seconds: config.source_timeout.as_secs().max(1),
            ..FetchConfig::default()
        })?;

        let mut aggregator = Self::new()
            .with_source_timeout(config.source_timeout)
            .with_source(
                Arc::new(WebSearchSource::new(fetcher.clone())),
                config.web_search_limit,
            )
            .with_source(
                Arc::new(RssFeedSource::new(fetcher.clone())),
                config.rss_per_feed_limit,
            )
            .with_source(
                Arc::new(CuratedApiSource::new(
                    fetcher,
                    config.curated_api_key.clone(),
                )),
                config.curated_limit,
            );
        aggregator.overall_timeout = config.overall_timeout;
        Ok(aggregator)
    }

    /// Registers a source. Registration order fixes the merge order, which
    /// keeps first-seen deduplication deterministic.
    pub fn with_source(mut self, adapter: Arc<dyn SourceAdapter>, limit: usize) -> Self {
        self.sources.push(SourceEntry { adapter, limit });
        self
    }

    /// Independent timeout budget per fetch task. A slow source does not
    /// extend its siblings' budgets.
    pub fn with_source_timeout(mut self, budget: Duration) -> Self {
        self.source_timeout = budget;
        self
    }

    /// Deadline for the whole call. When it elapses, outstanding tasks are
    /// canceled and the partial result accumulated so far is returned.
    pub fn with_overall_timeout(mut self, deadline: Duration) -> Self {
        self.overall_timeout = Some(deadline);
        self
    }

    pub async fn aggregate(&self, topic: &str, enabled: &[&str]) -> AggregationResult {
        let enabled_set: HashSet<&str> = enabled.iter().copied().collect();
        // Every enabled name gets an entry; sources no task reports on
        // keep the Available default.
        let mut statuses: BTreeMap<String, SourceStatus> = BTreeMap::new();
        for name in &enabled_set {
            statuses.insert(
                name.to_string(),
                SourceStatus {
                    name: name.to_string(),
                    state: SourceState::Available,
                },
            );
        }

        // One task per enabled registered source, each with its own budget.
        // Tasks own their result; the only join point is below.
        let mut tasks = Vec::new();
        for entry in &self.sources {
            let name = entry.adapter.name();
            if !enabled_set.contains(name) {
                continue;
            }
            let adapter = Arc::clone(&entry.adapter);
            let limit = entry.limit;
            let budget = self.source_timeout;
            let topic = topic.to_string();
            let handle = tokio::spawn(async move {
                match timeout(budget, adapter.fetch(&topic, limit)).await {
                    Ok(outcome) => outcome,
                    Err(_) => FetchOutcome::failed("timeout"),
                }
            });
            tasks.push((name, entry.adapter.lane(), handle));
        }

        let started = Instant::now();
        let mut canceled = false;
        let mut records: Vec<Article> = Vec::new();
        let mut featured: Vec<Article> = Vec::new();

        for (name, lane, handle) in tasks {
            let outcome = if canceled {
                // Only outstanding work is canceled; a task that beat the
                // deadline still contributes its outcome.
                if handle.is_finished() {
                    join_outcome(handle.await)
                } else {
                    handle.abort();
                    FetchOutcome::failed("canceled")
                }
            } else if let Some(deadline) = self.overall_timeout {
                let remaining = deadline.saturating_sub(started.elapsed());
                let abort = handle.abort_handle();
                match timeout(remaining, handle).await {
                    Ok(joined) => join_outcome(joined),
                    Err(_) => {
                        abort.abort();
                        canceled = true;
                        warn!("aggregation deadline elapsed, canceling remaining sources");
                        FetchOutcome::failed("canceled")
                    }
                }
            } else {
                join_outcome(handle.await)
            };

            let state = match (&outcome.error, outcome.articles.is_empty()) {
                (None, _) => SourceState::Available,
                (Some(reason), false) => {
                    warn!("source {} degraded: {}", name, reason);
                    SourceState::Degraded(reason.clone())
                }
                (Some(reason), true) => {
                    warn!("source {} unavailable: {}", name, reason);
                    SourceState::Unavailable(reason.clone())
                }
            };
            statuses.insert(
                name.to_string(),
                SourceStatus {
                    name: name.to_string(),
                    state,
                },
            );

            match lane {
                Lane::Main => records.extend(outcome.articles),
                Lane::Featured => featured.extend(outcome.articles),
            }
        }

        let mut records = dedupe_by_url(records);
        records.sort_by(|a, b| {
            b.published_at
                .cmp(&a.published_at)
                .then_with(|| a.source.cmp(&b.source))
                .then_with(|| a.title.cmp(&b.title))
        });

        info!(
            "aggregated {} records and {} featured for '{}' from {} sources",
            records.len(),
            featured.len(),
            topic,
            enabled_set.len()
        );

        AggregationResult {
            records,
            featured,
            statuses,
        }
    }
}

impl Default for NewsAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn join_outcome(
    joined: std::result::Result<FetchOutcome, tokio::task::JoinError>,
) -> FetchOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(e) if e.is_cancelled() => FetchOutcome::failed("canceled"),
        Err(e) => FetchOutcome::failed(format!("fetch task failed: {}", e)),
    }
}

/// Drops later duplicates by normalized URL; the first-seen record wins.
fn dedupe_by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| {
            let key = normalize_url(&article.url);
            seen.insert(key)
        })
        .collect()
}

/// URL identity is case-insensitive and trailing-slash-insensitive.
fn normalize_url(url: &str) -> String {
    url.trim().to_lowercase().trim_end_matches('/').to_string()
}
