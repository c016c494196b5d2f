//! Run configuration, passed explicitly into each component instead of the
//! process-wide constants the site's markup might tempt you into.

use std::path::PathBuf;
use std::time::Duration;

use crate::paginate::PageStyle;

/// Site root used to absolutize relative listing hrefs.
pub const BASE_URL: &str = "https://autostream.lk";

/// Dealer crawled when no URL is given on the command line.
pub const DEFAULT_DEALER_URL: &str = "https://autostream.lk/author/achalamansara9gmail-com/";

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub dealer_url: String,
    pub output: PathBuf,
    /// Polite delay between consecutive vehicle-page fetches. No delay is
    /// imposed between dealer-page fetches.
    pub delay: Duration,
    pub page_style: PageStyle,
    pub quiet: bool,
}
