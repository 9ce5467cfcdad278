use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use newshub::{
    Article, FetchOutcome, Lane, NewsAggregator, SourceAdapter, SourceState, CURATED_API,
    RSS_FEED, WEB_SEARCH,
};

/// Test double with a canned outcome and an optional artificial delay.
struct StubSource {
    name: &'static str,
    lane: Lane,
    outcome: FetchOutcome,
    delay: Option<Duration>,
}

impl StubSource {
    fn new(name: &'static str, outcome: FetchOutcome) -> Self {
        Self {
            name,
            lane: Lane::Main,
            outcome,
            delay: None,
        }
    }

    fn featured(mut self) -> Self {
        self.lane = Lane::Featured;
        self
    }

    fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SourceAdapter for StubSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn lane(&self) -> Lane {
        self.lane
    }

    async fn fetch(&self, _topic: &str, _limit: usize) -> FetchOutcome {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcome.clone()
    }
}

fn ts(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, hour, 0, 0).unwrap()
}

fn article(source: &str, title: &str, url: &str, published_at: DateTime<Utc>) -> Article {
    Article {
        title: title.to_string(),
        url: url.to_string(),
        body: format!("body of {}", title),
        source: source.to_string(),
        published_at,
        image: None,
    }
}

#[tokio::test]
async fn statuses_cover_exactly_the_enabled_sources() {
    let aggregator = NewsAggregator::new()
        .with_source(
            Arc::new(StubSource::new(WEB_SEARCH, FetchOutcome::ok(vec![]))),
            10,
        )
        .with_source(
            Arc::new(StubSource::new(RSS_FEED, FetchOutcome::ok(vec![]))),
            10,
        )
        .with_source(
            Arc::new(StubSource::new(CURATED_API, FetchOutcome::ok(vec![])).featured()),
            5,
        );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;

    let names: Vec<&str> = result.statuses.keys().map(|s| s.as_str()).collect();
    assert_eq!(names, vec![RSS_FEED, WEB_SEARCH]);
    assert!(result.statuses.values().all(|s| s.state.is_available()));
}

#[tokio::test]
async fn unreported_enabled_source_defaults_to_available() {
    let aggregator = NewsAggregator::new().with_source(
        Arc::new(StubSource::new(WEB_SEARCH, FetchOutcome::ok(vec![]))),
        10,
    );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, "Telegraph"]).await;

    assert_eq!(result.statuses.len(), 2);
    assert!(result.statuses["Telegraph"].state.is_available());
}

#[tokio::test]
async fn all_sources_failing_still_returns_a_result() {
    let aggregator = NewsAggregator::new()
        .with_source(
            Arc::new(StubSource::new(WEB_SEARCH, FetchOutcome::failed("boom"))),
            10,
        )
        .with_source(
            Arc::new(StubSource::new(RSS_FEED, FetchOutcome::failed("offline"))),
            10,
        );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;

    assert!(result.records.is_empty());
    assert!(result
        .statuses
        .values()
        .all(|s| !s.state.is_available()));
}

#[tokio::test]
async fn duplicate_urls_collapse_across_sources() {
    let when = ts(12);
    let aggregator = NewsAggregator::new()
        .with_source(
            Arc::new(StubSource::new(
                WEB_SEARCH,
                FetchOutcome::ok(vec![article(WEB_SEARCH, "first seen", "http://x.com/a", when)]),
            )),
            10,
        )
        .with_source(
            Arc::new(StubSource::new(
                RSS_FEED,
                FetchOutcome::ok(vec![
                    article(RSS_FEED, "duplicate", "http://X.com/a/", when),
                    article(RSS_FEED, "unique", "http://x.com/b", when),
                ]),
            )),
            10,
        );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;

    assert_eq!(result.records.len(), 2);
    let survivor = result
        .records
        .iter()
        .find(|a| a.url.to_lowercase().contains("/a"))
        .unwrap();
    assert_eq!(survivor.title, "first seen");
}

#[tokio::test]
async fn ordering_is_deterministic_and_idempotent() {
    let tied = ts(9);
    let build = || {
        NewsAggregator::new()
            .with_source(
                Arc::new(StubSource::new(
                    WEB_SEARCH,
                    FetchOutcome::ok(vec![
                        article(WEB_SEARCH, "zebra", "http://x.com/z", tied),
                        article(WEB_SEARCH, "apple", "http://x.com/ap", tied),
                        article(WEB_SEARCH, "newest", "http://x.com/n", ts(18)),
                    ]),
                )),
                10,
            )
            .with_source(
                Arc::new(StubSource::new(
                    RSS_FEED,
                    FetchOutcome::ok(vec![article(RSS_FEED, "middle", "http://x.com/m", tied)]),
                )),
                10,
            )
    };

    let first = build().aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;
    let second = build().aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;

    let titles: Vec<&str> = first.records.iter().map(|a| a.title.as_str()).collect();
    // Newest first, then ties by source name, then title.
    assert_eq!(titles, vec!["newest", "middle", "apple", "zebra"]);
    assert_eq!(first.records, second.records);
}

#[tokio::test]
async fn curated_records_stay_in_the_featured_lane() {
    let aggregator = NewsAggregator::new()
        .with_source(
            Arc::new(StubSource::new(
                WEB_SEARCH,
                FetchOutcome::ok(vec![article(WEB_SEARCH, "main", "http://x.com/1", ts(8))]),
            )),
            10,
        )
        .with_source(
            Arc::new(
                StubSource::new(
                    CURATED_API,
                    FetchOutcome::ok(vec![article(
                        CURATED_API,
                        "editorial pick",
                        "http://x.com/pick",
                        ts(8),
                    )]),
                )
                .featured(),
            ),
            5,
        );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, CURATED_API]).await;

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].title, "main");
    assert_eq!(result.featured.len(), 1);
    assert_eq!(result.featured[0].title, "editorial pick");
}

#[tokio::test]
async fn degraded_source_keeps_its_partial_records() {
    let aggregator = NewsAggregator::new().with_source(
        Arc::new(StubSource::new(
            RSS_FEED,
            FetchOutcome::partial(
                vec![article(RSS_FEED, "recovered", "http://x.com/r", ts(7))],
                "Reuters: HTTP status 500",
            ),
        )),
        10,
    );

    let result = aggregator.aggregate("topic", &[RSS_FEED]).await;

    assert_eq!(result.records.len(), 1);
    assert_eq!(
        result.statuses[RSS_FEED].state,
        SourceState::Degraded("Reuters: HTTP status 500".to_string())
    );
}

// Scenario from the reference configuration: search succeeds, RSS succeeds,
// curated source has no key.
#[tokio::test]
async fn climate_change_scenario() {
    let web_items: Vec<Article> = (0..20)
        .map(|i| {
            article(
                WEB_SEARCH,
                &format!("web {}", i),
                &format!("http://web.example/{}", i),
                ts(20),
            )
        })
        .collect();
    let rss_items: Vec<Article> = (0..9)
        .map(|i| {
            article(
                RSS_FEED,
                &format!("rss {}", i),
                &format!("http://rss.example/{}", i),
                ts(i % 12),
            )
        })
        .collect();

    let aggregator = NewsAggregator::new()
        .with_source(Arc::new(StubSource::new(WEB_SEARCH, FetchOutcome::ok(web_items))), 20)
        .with_source(Arc::new(StubSource::new(RSS_FEED, FetchOutcome::ok(rss_items))), 15)
        .with_source(
            Arc::new(StubSource::new(CURATED_API, FetchOutcome::failed("disabled")).featured()),
            5,
        );

    let result = aggregator
        .aggregate("climate change", &[WEB_SEARCH, RSS_FEED, CURATED_API])
        .await;

    assert!(result.featured.is_empty());
    assert!(result.records.len() <= 29);
    assert!(result
        .records
        .windows(2)
        .all(|w| w[0].published_at >= w[1].published_at));
    assert_eq!(
        result.statuses[CURATED_API].state,
        SourceState::Unavailable("disabled".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn slow_source_times_out_without_stalling_siblings() {
    let aggregator = NewsAggregator::new()
        .with_source_timeout(Duration::from_secs(1))
        .with_source(
            Arc::new(StubSource::new(
                WEB_SEARCH,
                FetchOutcome::ok(vec![article(WEB_SEARCH, "fast", "http://x.com/f", ts(5))]),
            )),
            10,
        )
        .with_source(
            Arc::new(
                StubSource::new(RSS_FEED, FetchOutcome::ok(vec![])).delayed(Duration::from_secs(60)),
            ),
            10,
        );

    let started = tokio::time::Instant::now();
    let result = aggregator.aggregate("topic", &[WEB_SEARCH, RSS_FEED]).await;

    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].source, WEB_SEARCH);
    assert_eq!(
        result.statuses[RSS_FEED].state,
        SourceState::Unavailable("timeout".to_string())
    );
    // The call completes at the timed-out task's budget, not its full delay.
    assert!(started.elapsed() < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn overall_deadline_cancels_outstanding_tasks_but_keeps_partials() {
    let aggregator = NewsAggregator::new()
        .with_source_timeout(Duration::from_secs(120))
        .with_overall_timeout(Duration::from_secs(2))
        .with_source(
            Arc::new(StubSource::new(
                WEB_SEARCH,
                FetchOutcome::ok(vec![article(WEB_SEARCH, "quick", "http://x.com/q", ts(4))]),
            )),
            10,
        )
        .with_source(
            Arc::new(
                StubSource::new(RSS_FEED, FetchOutcome::ok(vec![])).delayed(Duration::from_secs(90)),
            ),
            10,
        )
        .with_source(
            Arc::new(
                StubSource::new(CURATED_API, FetchOutcome::ok(vec![]))
                    .featured()
                    .delayed(Duration::from_secs(90)),
            ),
            5,
        );

    let result = aggregator
        .aggregate("topic", &[WEB_SEARCH, RSS_FEED, CURATED_API])
        .await;

    assert_eq!(result.records.len(), 1);
    assert_eq!(
        result.statuses[RSS_FEED].state,
        SourceState::Unavailable("canceled".to_string())
    );
    assert_eq!(
        result.statuses[CURATED_API].state,
        SourceState::Unavailable("canceled".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn source_finished_before_the_deadline_keeps_its_records() {
    // The slow source is joined first and trips the deadline; the featured
    // source finished long before it and must not be written off.
    let aggregator = NewsAggregator::new()
        .with_source_timeout(Duration::from_secs(120))
        .with_overall_timeout(Duration::from_secs(10))
        .with_source(
            Arc::new(
                StubSource::new(WEB_SEARCH, FetchOutcome::ok(vec![])).delayed(Duration::from_secs(90)),
            ),
            10,
        )
        .with_source(
            Arc::new(
                StubSource::new(
                    CURATED_API,
                    FetchOutcome::ok(vec![article(
                        CURATED_API,
                        "finished in time",
                        "http://x.com/done",
                        ts(3),
                    )]),
                )
                .featured()
                .delayed(Duration::from_secs(1)),
            ),
            5,
        );

    let result = aggregator.aggregate("topic", &[WEB_SEARCH, CURATED_API]).await;

    assert_eq!(
        result.statuses[WEB_SEARCH].state,
        SourceState::Unavailable("canceled".to_string())
    );
    assert!(result.statuses[CURATED_API].state.is_available());
    assert_eq!(result.featured.len(), 1);
    assert_eq!(result.featured[0].title, "finished in time");
}
