pub mod fetch;
pub mod parse;

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use tracing::{info, warn};

use crate::config::Settings;
use crate::model::RawRecord;
use crate::storage;

/// Scrape stats returned after completion.
pub struct ScrapeStats {
    pub pages_fetched: usize,
    pub pages_skipped: usize,
    pub records: usize,
}

/// Scrape every configured category sequentially and persist the combined
/// record sequence to the raw data file. Failed pages are skipped, not
/// fatal; a page with no listings ends pagination for its category.
pub fn run(settings: &Settings) -> Result<ScrapeStats> {
    let client = fetch::Client::new()?;
    let policy = fetch::RetryPolicy::new(settings.max_retries);

    let total_pages = settings.categories.len() * settings.max_pages_per_category;
    let pb = ProgressBar::new(total_pages as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages ({msg})")?
            .progress_chars("=> "),
    );

    let mut records: Vec<RawRecord> = Vec::new();
    let mut stats = ScrapeStats {
        pages_fetched: 0,
        pages_skipped: 0,
        records: 0,
    };

    for category in &settings.categories {
        pb.set_message(category.clone());
        info!(%category, "scraping category");

        for page in 1..=settings.max_pages_per_category {
            let body = fetch::fetch_with_retry(|| client.fetch_page(category, page), &policy);
            pb.inc(1);

            let html = match body {
                Ok(html) => html,
                Err(e) => {
                    warn!(%category, page, "page skipped after retries: {e}");
                    stats.pages_skipped += 1;
                    continue;
                }
            };
            stats.pages_fetched += 1;

            let page_records = parse::parse_listing_page(&html, category);
            if page_records.is_empty() {
                info!(%category, page, "no listings found, stopping category");
                let remaining = settings.max_pages_per_category - page;
                pb.inc(remaining as u64);
                break;
            }
            info!(%category, page, count = page_records.len(), "parsed page");
            records.extend(page_records);

            polite_delay(settings);
        }
    }

    pb.finish_and_clear();
    stats.records = records.len();
    storage::save_json(&records, &settings.raw_path())?;
    info!(
        records = stats.records,
        fetched = stats.pages_fetched,
        skipped = stats.pages_skipped,
        path = %settings.raw_path().display(),
        "scrape complete"
    );
    Ok(stats)
}

/// Sleep a uniform random duration within the configured delay range.
fn polite_delay(settings: &Settings) {
    let secs = rand::rng().random_range(settings.delay_min_secs..=settings.delay_max_secs);
    std::thread::sleep(Duration::from_secs_f64(secs));
}
