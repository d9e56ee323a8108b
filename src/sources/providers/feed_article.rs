// src/sources/providers/feed_article.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::config::rates::FeedConfig;
use crate::extract::PriceExtractor;
use crate::sources::fetch::DynFetcher;
use crate::sources::text::{html_to_text, parse_feed, FeedEntry};
use crate::sources::types::{Observation, PriceSource};

/// News feed: scan the newest `scan_cap` entries whose title mentions the
/// keyword. Try the title first, fetch the article only if the title has no
/// price. The first entry that yields a price wins.
pub struct FeedArticleSource {
    name: String,
    url: String,
    feed: FeedConfig,
    fetcher: DynFetcher,
    extractor: Arc<PriceExtractor>,
}

impl FeedArticleSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        feed: FeedConfig,
        fetcher: DynFetcher,
        extractor: Arc<PriceExtractor>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            feed,
            fetcher,
            extractor,
        }
    }

    fn matches_keyword(&self, entry: &FeedEntry) -> bool {
        entry.title.to_lowercase().contains(&self.feed.keyword)
    }

    async fn article_price(&self, link: &str) -> Result<Option<u64>> {
        let html = self
            .fetcher
            .fetch(link)
            .await
            .and_then(|page| page.into_success_body(link))
            .with_context(|| format!("fetching article {link}"))?;
        Ok(self.extractor.best_price(&html_to_text(&html)).await)
    }

    /// Title first, then the linked article. A failed article fetch fails
    /// the whole source.
    async fn entry_price(&self, entry: &FeedEntry) -> Result<Option<u64>> {
        if let Some(price) = self.extractor.best_price(&entry.title).await {
            debug!(target: "rates", source = %self.name, title = %entry.title, "price found in title");
            return Ok(Some(price));
        }
        match entry.link.as_deref() {
            Some(link) => self.article_price(link).await,
            None => Ok(None),
        }
    }
}

#[async_trait]
impl PriceSource for FeedArticleSource {
    async fn observe(&self) -> Result<Option<Observation>> {
        let xml = self
            .fetcher
            .fetch(&self.url)
            .await?
            .into_success_body(&self.url)?;
        let entries = parse_feed(&xml)?;

        for entry in entries.iter().take(self.feed.scan_cap) {
            if !self.matches_keyword(entry) {
                continue;
            }
            debug!(
                target: "rates",
                source = %self.name,
                title = %entry.title,
                published_at = ?entry.published_at,
                "matching feed entry"
            );
            if let Some(price) = self.entry_price(entry).await? {
                let url = entry.link.clone().unwrap_or_else(|| self.url.clone());
                return Ok(Some(Observation::new(price, &self.name, url)));
            }
        }
        Ok(None)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
