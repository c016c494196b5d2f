//! Blocking HTTP fetch behind the page-source seam the crawler runs on.

use anyhow::{Context, Result};
use scraper::Html;

/// Anything that can turn a URL into a parsed HTML document.
///
/// Production code uses [`HttpClient`]; the paginator tests drive the crawl
/// with scripted page sequences instead of the network.
pub trait PageSource {
    fn fetch(&mut self, url: &str) -> Result<Html>;
}

pub struct HttpClient {
    client: reqwest::blocking::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; AutostreamScraper/1.0)")
            .build()?;
        Ok(Self { client })
    }
}

impl PageSource for HttpClient {
    fn fetch(&mut self, url: &str) -> Result<Html> {
        let response = self
            .client
            .get(url)
            .send()
            .with_context(|| format!("Failed to fetch: {}", url))?;

        let text = response
            .text()
            .with_context(|| format!("Failed to read response: {}", url))?;

        Ok(Html::parse_document(&text))
    }
}
