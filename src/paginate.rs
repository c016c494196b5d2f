//! Listing-link discovery and pagination across a dealer's pages.

use anyhow::Result;
use scraper::{Html, Selector};
use std::collections::HashSet;

use crate::fetch::PageSource;

/// Path marker identifying individual listing pages.
const LISTING_PATH: &str = "/listings/";

fn sel(s: &str) -> Selector {
    Selector::parse(s).unwrap()
}

/// Discovered listing URLs, deduplicated by exact string equality while
/// preserving first-seen order.
#[derive(Debug, Default)]
pub struct AdLinkSet {
    seen: HashSet<String>,
    links: Vec<String>,
}

impl AdLinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the URL was not already present.
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.insert(url.clone()) {
            self.links.push(url);
            true
        } else {
            false
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.links
    }
}

/// Prefix relative hrefs with the site's base URL.
fn absolutize(href: &str, base_url: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", base_url, href)
    }
}

/// Extract listing links from one dealer page: anchors under the
/// listing-row containers whose href contains the listing path marker,
/// absolutized and deduplicated within the page.
pub fn page_ad_links(doc: &Html, base_url: &str) -> Vec<String> {
    let row_sel = sel(".car-listing-row.row.row-3");
    let anchor_sel = sel("a[href]");

    let mut links = AdLinkSet::new();
    for row in doc.select(&row_sel) {
        for anchor in row.select(&anchor_sel) {
            if let Some(href) = anchor.value().attr("href") {
                if href.contains(LISTING_PATH) {
                    links.insert(absolutize(href, base_url));
                }
            }
        }
    }
    links.into_vec()
}

fn has_next_page(doc: &Html) -> bool {
    doc.select(&sel(".heading-font.next")).next().is_some()
}

/// How a dealer page paginates. Each crawl uses exactly one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStyle {
    /// Walk numbered `page/N/` URLs until a page yields no links or the
    /// next-page control disappears.
    Numbered,
    /// The page is served fully expanded (the site's "show more" flavor);
    /// a single fetch collects everything.
    SinglePage,
}

/// Collect the complete, deduplicated set of listing URLs for a dealer.
///
/// A fetch failure here is fatal: dealer enumeration has no per-page
/// recovery, unlike individual vehicle scrapes.
pub fn collect_dealer_ads(
    source: &mut dyn PageSource,
    dealer_url: &str,
    base_url: &str,
    style: PageStyle,
    quiet: bool,
) -> Result<Vec<String>> {
    let mut all = AdLinkSet::new();

    match style {
        PageStyle::SinglePage => {
            let doc = source.fetch(dealer_url)?;
            for link in page_ad_links(&doc, base_url) {
                all.insert(link);
            }
        }
        PageStyle::Numbered => {
            let mut page = 1u32;
            loop {
                let url = if page == 1 {
                    dealer_url.to_string()
                } else {
                    format!("{}page/{}/", dealer_url, page)
                };
                let doc = source.fetch(&url)?;

                let links = page_ad_links(&doc, base_url);
                if links.is_empty() {
                    break;
                }
                let before = all.len();
                for link in links {
                    all.insert(link);
                }
                if !quiet {
                    println!("  Found {} ads on page {}", all.len() - before, page);
                }

                if !has_next_page(&doc) {
                    break;
                }
                page += 1;
            }
        }
    }

    Ok(all.into_vec())
}
