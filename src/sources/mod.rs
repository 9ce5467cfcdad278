pub mod curated;
pub mod rss_feed;
pub mod web_search;

pub use curated::CuratedApiSource;
pub use rss_feed::{FeedSpec, RssFeedSource};
pub use web_search::WebSearchSource;
