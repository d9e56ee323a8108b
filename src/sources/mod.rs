// src/sources/mod.rs
pub mod fetch;
pub mod providers;
pub mod text;
pub mod types;

use anyhow::Result;
use std::sync::Arc;

use crate::config::{RatesConfig, SourceSpec};
use crate::extract::PriceExtractor;
use crate::sources::fetch::DynFetcher;
use crate::sources::providers::{FeedArticleSource, PatternSource, StaticPageSource};
use crate::sources::types::PriceSource;

pub use crate::sources::types::Observation;

/// Instantiate the configured sources in config order.
pub fn build_sources(
    cfg: &RatesConfig,
    fetcher: DynFetcher,
    extractor: Arc<PriceExtractor>,
) -> Result<Vec<Box<dyn PriceSource>>> {
    let mut out: Vec<Box<dyn PriceSource>> = Vec::with_capacity(cfg.sources.len());
    for spec in &cfg.sources {
        let source: Box<dyn PriceSource> = match spec {
            SourceSpec::StaticPage { name, url } => Box::new(StaticPageSource::new(
                name.as_str(),
                url.as_str(),
                fetcher.clone(),
                extractor.clone(),
            )),
            SourceSpec::FeedArticle { name, url } => Box::new(FeedArticleSource::new(
                name.as_str(),
                url.as_str(),
                cfg.feed.clone(),
                fetcher.clone(),
                extractor.clone(),
            )),
            SourceSpec::Pattern { name, url, pattern } => Box::new(PatternSource::new(
                name.as_str(),
                url.as_str(),
                pattern,
                cfg.range,
                fetcher.clone(),
            )?),
        };
        out.push(source);
    }
    Ok(out)
}
