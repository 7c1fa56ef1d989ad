pub mod clean;
pub mod price;

use std::collections::HashSet;

use anyhow::Result;
use tracing::info;

use crate::config::Settings;
use crate::model::{CleanRecord, PriceBucket, QualityReport, RawRecord};
use crate::storage;

/// Run the full ETL phase: read the raw record file, apply the cleaning
/// chain, and persist the tabular dataset plus the quality report.
pub fn run(settings: &Settings) -> Result<(Vec<CleanRecord>, QualityReport)> {
    storage::require_input(&settings.raw_path(), "scrape")?;
    let raw: Vec<RawRecord> = storage::load_json(&settings.raw_path())?;
    info!(records = raw.len(), "extracted raw records");

    let (records, quality) = transform(&raw);

    storage::write_csv(&records, &settings.processed_path())?;
    storage::save_json(&quality, &settings.quality_path())?;
    info!(
        kept = records.len(),
        valid = quality.valid_records,
        duplicates = quality.duplicate_count,
        invalid_prices = quality.invalid_price_count,
        path = %settings.processed_path().display(),
        "transform complete"
    );
    Ok((records, quality))
}

/// Apply the cleaning rules in fixed order: text normalization, price
/// parsing, location split, deduplication, validity. A bad record never
/// aborts the run; it only moves quality counters. Deterministic, so
/// repeated runs over one input agree exactly.
pub fn transform(raw: &[RawRecord]) -> (Vec<CleanRecord>, QualityReport) {
    let mut quality = QualityReport {
        total_records: raw.len(),
        ..Default::default()
    };
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(raw.len());

    for r in raw {
        // 1. Text fields
        let title = clean::normalize_text(&r.title);
        let supplier = match r.supplier.as_deref().map(clean::normalize_text) {
            Some(s) if !s.is_empty() => s,
            _ => {
                quality.missing_supplier += 1;
                "Unknown".to_string()
            }
        };
        let category = clean::normalize_text(&r.category);
        if r.url.is_none() {
            quality.missing_url += 1;
        }
        let has_location = r.location.as_deref().is_some_and(|l| !l.trim().is_empty());
        if !has_location {
            quality.missing_location += 1;
        }

        // 2. Price
        let parsed = match r.price_text.as_deref() {
            Some(t) if !t.trim().is_empty() => {
                let p = price::parse_price(t);
                if p.is_none() {
                    quality.invalid_price_count += 1;
                }
                p
            }
            _ => {
                quality.missing_price += 1;
                None
            }
        };

        // 3. Location
        let (city, state) = clean::split_location(r.location.as_deref());

        // 4. Dedup: first occurrence wins
        let dedup_key = format!("{}|{}", title.to_lowercase(), supplier.to_lowercase());
        if !seen.insert(dedup_key.clone()) {
            quality.duplicate_count += 1;
            continue;
        }

        // 5. Validity
        let valid = !title.is_empty() && (parsed.is_some() || has_location);

        let is_major = clean::is_major_city(&city);
        records.push(CleanRecord {
            title,
            supplier,
            category,
            price: parsed.as_ref().map(|p| p.amount),
            currency: parsed.as_ref().and_then(|p| p.currency.clone()),
            unit: parsed.as_ref().and_then(|p| p.unit.clone()),
            price_bucket: parsed.as_ref().map(|p| PriceBucket::from_amount(p.amount)),
            city,
            state,
            is_major_city: is_major,
            has_image: r.image_url.is_some(),
            url: r.url.clone(),
            dedup_key,
            valid,
        });
    }

    quality.valid_records = records.iter().filter(|r| r.valid).count();
    quality.completeness_pct = completeness(&quality);
    (records, quality)
}

/// Share of the tracked optional fields (price, location, supplier, url)
/// that actually carried a value.
fn completeness(q: &QualityReport) -> f64 {
    if q.total_records == 0 {
        return 0.0;
    }
    let cells = (q.total_records * 4) as f64;
    let missing = (q.missing_price + q.missing_location + q.missing_supplier + q.missing_url) as f64;
    (1.0 - missing / cells) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(title: &str, price: &str, location: &str, supplier: &str) -> RawRecord {
        RawRecord {
            title: title.to_string(),
            price_text: (!price.is_empty()).then(|| price.to_string()),
            location: (!location.is_empty()).then(|| location.to_string()),
            supplier: (!supplier.is_empty()).then(|| supplier.to_string()),
            url: None,
            image_url: None,
            category: "industrial machinery".to_string(),
            scraped_at: Utc::now(),
        }
    }

    #[test]
    fn steel_pipe_scenario() {
        let input = vec![
            raw("Steel Pipe", "₹500/meter", "Mumbai, Maharashtra", "ABC Corp"),
            raw("steel pipe", "invalid", "", "ABC Corp"),
        ];
        let (records, quality) = transform(&input);

        assert_eq!(records.len(), 1);
        assert!(records[0].valid);
        assert_eq!(records[0].price, Some(500.0));
        assert_eq!(records[0].city, "Mumbai");
        assert_eq!(records[0].state, "Maharashtra");
        assert!(records[0].is_major_city);
        assert_eq!(quality.duplicate_count, 1);
        assert_eq!(quality.invalid_price_count, 1);
        assert_eq!(quality.valid_records, 1);
    }

    #[test]
    fn idempotent_over_same_input() {
        let input = vec![
            raw("Steel Pipe", "₹500/meter", "Mumbai, Maharashtra", "ABC Corp"),
            raw("CNC Lathe", "Ask Price", "Rajkot, Gujarat", "Patel Machines"),
            raw("Steel  Pipe", "₹600/meter", "Pune", "ABC Corp"),
        ];
        let first = transform(&input);
        let second = transform(&input);
        assert_eq!(first, second);
    }

    #[test]
    fn dedup_counts_every_drop() {
        let input = vec![
            raw("Bolt", "₹10/piece", "Ludhiana, Punjab", "Fastener Co"),
            raw("BOLT", "₹11/piece", "Ludhiana, Punjab", "fastener co"),
            raw("bolt", "₹12/piece", "Ludhiana, Punjab", "Fastener Co"),
        ];
        let (records, quality) = transform(&input);
        assert_eq!(records.len(), 1);
        assert_eq!(quality.duplicate_count, 2);
        assert_eq!(records[0].price, Some(10.0));
    }

    #[test]
    fn unparsed_price_with_location_stays_valid() {
        let input = vec![raw("CNC Lathe", "Ask Price", "Rajkot, Gujarat", "Patel Machines")];
        let (records, quality) = transform(&input);
        assert!(records[0].valid);
        assert!(records[0].price.is_none());
        assert_eq!(quality.invalid_price_count, 1);
    }

    #[test]
    fn no_price_no_location_is_invalid() {
        let input = vec![raw("Mystery Item", "", "", "Someone")];
        let (records, quality) = transform(&input);
        assert_eq!(records.len(), 1);
        assert!(!records[0].valid);
        assert_eq!(quality.valid_records, 0);
        assert_eq!(quality.missing_price, 1);
        assert_eq!(quality.missing_location, 1);
    }

    #[test]
    fn empty_input() {
        let (records, quality) = transform(&[]);
        assert!(records.is_empty());
        assert_eq!(quality.total_records, 0);
        assert_eq!(quality.completeness_pct, 0.0);
    }
}
