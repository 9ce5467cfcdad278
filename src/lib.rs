pub mod aggregator;
pub mod config;
pub mod fetcher;
pub mod image;
pub mod paginate;
pub mod sources;
pub mod summarize;
pub mod traits;
pub mod types;
pub mod utils;

pub use aggregator::NewsAggregator;
pub use config::AppConfig;
pub use fetcher::{FetchConfig, HttpFetcher};
pub use image::{ImageResolver, PLACEHOLDER_IMAGE};
pub use paginate::{page, PageInfo};
pub use summarize::SummarizationClient;
pub use traits::{FetchOutcome, Lane, SourceAdapter};
pub use types::*;
