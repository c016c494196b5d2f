use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod extract;
mod fetch;
mod normalize;
mod paginate;
mod record;
mod scrape;
mod store;
mod utils;

use config::Config;
use paginate::PageStyle;

#[derive(Parser)]
#[command(name = "autostream-scrape")]
#[command(about = "Dealer and vehicle-listing scraper for autostream.lk")]
struct Cli {
    /// Dealer listing page to crawl
    #[arg(value_name = "DEALER_URL", default_value = config::DEFAULT_DEALER_URL)]
    dealer_url: String,

    /// Output CSV file
    #[arg(short, long, default_value = "vehicle_data.csv")]
    output: PathBuf,

    /// Seconds to wait between vehicle page fetches
    #[arg(long, default_value_t = 1)]
    delay_secs: u64,

    /// Treat the dealer page as a single fully expanded page instead of
    /// walking numbered pages
    #[arg(long)]
    single_page: bool,

    /// Quiet mode - suppress progress output
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config {
        base_url: config::BASE_URL.to_string(),
        dealer_url: cli.dealer_url,
        output: cli.output,
        delay: Duration::from_secs(cli.delay_secs),
        page_style: if cli.single_page {
            PageStyle::SinglePage
        } else {
            PageStyle::Numbered
        },
        quiet: cli.quiet,
    };

    scrape::run_scrape(&config)
}
