use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use newshub::utils::{strip_html, truncate_chars};
use newshub::{
    page, AppConfig, HttpFetcher, ImageResolver, NewsAggregator, SourceState,
    SummarizationClient,
};

/// Search several news sources and print a merged, paginated feed.
#[derive(Debug, Parser)]
#[command(name = "newshub", version)]
struct Cli {
    /// Topic to search for.
    topic: String,

    /// Comma-separated source names (default: all configured sources).
    #[arg(long, value_delimiter = ',')]
    sources: Option<Vec<String>>,

    /// 1-indexed page of the main feed to print.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Resolve a representative image for each printed article.
    #[arg(long)]
    images: bool,

    /// Summarize the first article on the page (requires HF_TOKEN).
    #[arg(long)]
    summarize: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let enabled: Vec<String> = cli
        .sources
        .unwrap_or_else(|| config.enabled_sources.clone());
    let enabled_refs: Vec<&str> = enabled.iter().map(|s| s.as_str()).collect();

    info!("searching '{}' across {:?}", cli.topic, enabled);

    let aggregator = NewsAggregator::from_config(&config)?;
    let result = aggregator.aggregate(&cli.topic, &enabled_refs).await;

    println!("== Source status ==");
    for status in result.statuses.values() {
        match &status.state {
            SourceState::Available => println!("  {}: available", status.name),
            SourceState::Degraded(reason) => println!("  {}: degraded ({})", status.name, reason),
            SourceState::Unavailable(reason) => {
                println!("  {}: unavailable ({})", status.name, reason)
            }
        }
    }

    if !result.featured.is_empty() {
        println!("\n== Featured ==");
        for item in &result.featured {
            println!("  {} [{}]", truncate_chars(&item.title, 80), item.url);
        }
    }

    let (slice, info) = page(&result.records, config.page_size, cli.page);
    println!(
        "\n== Latest news (page {} of {}, {} total) ==",
        info.page,
        info.total_pages,
        result.records.len()
    );

    let resolver = cli
        .images
        .then(|| ImageResolver::new(HttpFetcher::default()));
    for article in slice {
        println!("\n{} [{}]", article.title, article.source);
        println!("  {}", article.url);
        println!("  {}", article.published_at.format("%B %d, %Y at %H:%M"));
        let body = strip_html(&article.body);
        if !body.is_empty() {
            println!("  {}", truncate_chars(&body, 300));
        }
        if let Some(resolver) = &resolver {
            println!("  image: {}", resolver.resolve(article).await);
        }
    }

    if cli.summarize {
        match (&config.summarizer_token, slice.first()) {
            (Some(token), Some(article)) if !article.body.is_empty() => {
                let client = SummarizationClient::new(HttpFetcher::default(), token.clone());
                match client.summarize(&strip_html(&article.body)).await {
                    Ok(summary) => println!("\n== Summary ==\n{}", summary),
                    Err(e) => warn!("summarization failed, showing raw body: {}", e),
                }
            }
            (None, _) => warn!("--summarize requires HF_TOKEN"),
            _ => {}
        }
    }

    Ok(())
}
