//! Crawl orchestration: dealer info once, then every ad, then one save.

use anyhow::Result;
use std::io::{self, Write};
use std::thread;

use crate::config::Config;
use crate::extract::{self, DealerInfo};
use crate::fetch::{HttpClient, PageSource};
use crate::paginate;
use crate::record::Record;
use crate::store;
use crate::utils::{osc8_file_link, osc8_link};

fn scrape_vehicle(
    source: &mut dyn PageSource,
    dealer: &DealerInfo,
    ad_url: &str,
    index: usize,
    total: usize,
    quiet: bool,
) -> Result<Record> {
    let mut stdout = io::stdout();
    if !quiet {
        print!(
            "[{:02}/{:02}] Scraping: {}",
            index,
            total,
            osc8_link(ad_url, ad_url)
        );
        stdout.flush()?;
    }

    let doc = source.fetch(ad_url)?;
    let record = extract::vehicle_record(&doc, dealer, ad_url);

    if !quiet {
        println!(" ({} fields)", record.len());
    }
    Ok(record)
}

/// Scrape one dealer end to end and append the results to the store.
///
/// Individual vehicle failures are logged and skipped; errors during dealer
/// enumeration or the final save terminate the run.
pub fn run_scrape(config: &Config) -> Result<()> {
    let mut client = HttpClient::new()?;

    if !config.quiet {
        println!("Scraping dealer: {}", config.dealer_url);
    }
    let dealer_doc = client.fetch(&config.dealer_url)?;
    let dealer = extract::dealer_info(&dealer_doc);
    if !config.quiet {
        println!("Dealer: {} ({})", dealer.name, dealer.location);
    }

    let ad_urls = paginate::collect_dealer_ads(
        &mut client,
        &config.dealer_url,
        &config.base_url,
        config.page_style,
        config.quiet,
    )?;

    if ad_urls.is_empty() {
        println!("No ads found for {}", config.dealer_url);
        return Ok(());
    }

    let total = ad_urls.len();
    if !config.quiet {
        println!("Found {} ads in total\n", total);
    }

    let mut records = Vec::new();
    for (i, ad_url) in ad_urls.iter().enumerate() {
        match scrape_vehicle(&mut client, &dealer, ad_url, i + 1, total, config.quiet) {
            Ok(record) => records.push(record),
            Err(e) => eprintln!("Error scraping {}: {}", ad_url, e),
        }
        if i + 1 < total {
            thread::sleep(config.delay);
        }
    }

    store::append_records(&config.output, &records)?;

    if !config.quiet {
        let name = config.output.to_string_lossy();
        println!(
            "\nScraped {} of {} ads to {}",
            records.len(),
            total,
            osc8_file_link(&config.output, &name)
        );
    }

    Ok(())
}
