// src/sources/fetch.rs
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::config::rates::HttpConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body of a 2xx page, error otherwise.
    pub fn into_success_body(self, url: &str) -> Result<String> {
        if !self.is_success() {
            bail!("GET {url} returned status {}", self.status);
        }
        Ok(self.body)
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Page>;
}

pub type DynFetcher = Arc<dyn PageFetcher>;

/// reqwest client dressed as a desktop browser; one bounded attempt per call.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(cfg: &HttpConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = reqwest::Client::builder()
            .user_agent(cfg.user_agent.clone())
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(cfg.timeout_secs.min(5)))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building page http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .with_context(|| format!("reading body of {url}"))?;
        Ok(Page { status, body })
    }
}

/// In-memory fetcher serving canned pages; records every requested URL.
/// Unknown URLs fail like a network error.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: HashMap<String, Page>,
    pub calls: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, page: Page) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn with_body(self, url: &str, body: &str) -> Self {
        self.with_page(url, Page::ok(body))
    }

    pub fn requested(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PageFetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<Page> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow!("no fixture for {url}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_fetcher_serves_and_records() {
        let f = FixtureFetcher::new().with_body("https://a.test/", "hello");
        let page = f.fetch("https://a.test/").await.unwrap();
        assert_eq!(page.body, "hello");
        assert!(f.fetch("https://b.test/").await.is_err());
        assert_eq!(f.requested(), vec!["https://a.test/", "https://b.test/"]);
    }

    #[test]
    fn non_success_page_is_an_error() {
        let p = Page {
            status: 503,
            body: "busy".into(),
        };
        assert!(p.into_success_body("https://x.test/").is_err());
        assert_eq!(Page::ok("b").into_success_body("u").unwrap(), "b");
    }
}
