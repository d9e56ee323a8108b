// src/sources/providers/pattern.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use regex::Regex;

use crate::price::{clean_price, PriceRange};
use crate::sources::fetch::DynFetcher;
use crate::sources::text::html_to_text;
use crate::sources::types::{Observation, PriceSource};

/// Pages that print the rate in a fixed textual shape: take the first match
/// of `pattern`, normalize it and range-check it. No QA involved.
pub struct PatternSource {
    name: String,
    url: String,
    pattern: Regex,
    range: PriceRange,
    fetcher: DynFetcher,
}

impl PatternSource {
    pub fn new(
        name: impl Into<String>,
        url: impl Into<String>,
        pattern: &str,
        range: PriceRange,
        fetcher: DynFetcher,
    ) -> Result<Self> {
        let pattern =
            Regex::new(pattern).with_context(|| format!("compiling source pattern {pattern:?}"))?;
        Ok(Self {
            name: name.into(),
            url: url.into(),
            pattern,
            range,
            fetcher,
        })
    }

    /// First pattern match in `text`, if it is a plausible price.
    pub fn price_in(&self, text: &str) -> Option<u64> {
        let m = self.pattern.find(text)?;
        self.range.accept(clean_price(Some(m.as_str())))
    }
}

#[async_trait]
impl PriceSource for PatternSource {
    async fn observe(&self) -> Result<Option<Observation>> {
        let html = self
            .fetcher
            .fetch(&self.url)
            .await?
            .into_success_body(&self.url)?;
        let text = html_to_text(&html);
        let price = self.price_in(&text);
        if price.is_none() {
            tracing::debug!(target: "rates", source = %self.name, "pattern matched no plausible price");
        }
        Ok(price.map(|p| Observation::new(p, &self.name, &self.url)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
