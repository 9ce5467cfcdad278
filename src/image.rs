use std::time::Duration;

use scraper::{Html, Selector};
use tracing::debug;

use crate::fetcher::HttpFetcher;
use crate::types::Article;

/// Placeholder shown when every resolution strategy comes up empty.
pub const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=400&h=200&fit=crop";

const PAGE_FETCH_BUDGET: Duration = Duration::from_secs(5);

/// Best-effort extraction of a representative image URL for an article.
/// Every step swallows its own errors and falls through to the next;
/// resolution never fails and never blocks aggregation.
pub struct ImageResolver {
    fetcher: HttpFetcher,
    page_fetch_budget: Duration,
}

impl ImageResolver {
    pub fn new(fetcher: HttpFetcher) -> Self {
        Self {
            fetcher,
            page_fetch_budget: PAGE_FETCH_BUDGET,
        }
    }

    pub fn with_page_fetch_budget(mut self, budget: Duration) -> Self {
        self.page_fetch_budget = budget;
        self
    }

    pub async fn resolve(&self, article: &Article) -> String {
        if let Some(image) = &article.image {
            return image.clone();
        }

        if let Some(src) = first_img_src(&article.body) {
            debug!("resolved image from body HTML for '{}'", article.title);
            return src;
        }

        if !article.url.is_empty() {
            if let Some(src) = self.og_image_from_page(&article.url).await {
                debug!("resolved og:image from linked page for '{}'", article.title);
                return src;
            }
        }

        PLACEHOLDER_IMAGE.to_string()
    }

    async fn og_image_from_page(&self, url: &str) -> Option<String> {
        let html = self
            .fetcher
            .get_text_within(url, self.page_fetch_budget)
            .await
            .ok()?;
        og_image(&html)
    }
}

/// First `<img src>` in an HTML fragment, if any.
fn first_img_src(html: &str) -> Option<String> {
    if html.is_empty() {
        return None;
    }
    let selector = Selector::parse("img").ok()?;
    let fragment = Html::parse_fragment(html);
    fragment
        .select(&selector)
        .find_map(|img| img.value().attr("src"))
        .filter(|src| !src.trim().is_empty())
        .map(|src| src.to_string())
}

fn og_image(html: &str) -> Option<String> {
    let selector = Selector::parse(r#"meta[property="og:image"]"#).ok()?;
    let document = Html::parse_document(html);
    document
        .select(&selector)
        .find_map(|meta| meta.value().attr("content"))
        .filter(|content| !content.trim().is_empty())
        .map(|content| content.to_string())
}
