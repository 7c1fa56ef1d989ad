use std::path::PathBuf;

use chrono::Utc;

use mart_scraper::config::Settings;
use mart_scraper::model::{QualityReport, RawRecord};
use mart_scraper::scrape::parse;
use mart_scraper::{eda, etl, storage};

fn test_settings(name: &str) -> Settings {
    let base = std::env::temp_dir()
        .join("mart_scraper_tests")
        .join(format!("{}_{}", name, std::process::id()));
    Settings {
        data_dir: base.join("data"),
        analysis_dir: base.join("analysis_results"),
        ..Settings::default()
    }
}

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
fn etl_then_eda_over_files() {
    let settings = test_settings("full");
    let records = vec![
        raw("Steel Pipe", "₹500/meter", "Mumbai, Maharashtra", "ABC Corp"),
        raw("steel pipe", "invalid", "", "ABC Corp"),
        raw("CNC Lathe", "₹2,50,000", "Rajkot, Gujarat", "Patel Machines"),
    ];
    storage::save_json(&records, &settings.raw_path()).unwrap();

    let (clean, quality) = etl::run(&settings).unwrap();
    assert_eq!(clean.len(), 2);
    assert_eq!(quality.duplicate_count, 1);
    assert_eq!(quality.invalid_price_count, 1);
    assert!(settings.processed_path().exists());
    assert!(settings.quality_path().exists());

    let insights = eda::run(&settings).unwrap();
    assert_eq!(insights.overview.total_records, 2);
    assert_eq!(insights.overview.valid_records, 2);
    assert_eq!(insights.price_summary.count, 2);
    assert!(settings.insights_path().exists());
    assert!(settings.report_path().exists());

    let report = std::fs::read_to_string(settings.report_path()).unwrap();
    assert!(report.contains("## Executive Summary"));

    // Loaded back, the insights file matches what the run returned.
    let reloaded: mart_scraper::eda::report::InsightsReport =
        storage::load_json(&settings.insights_path()).unwrap();
    assert_eq!(reloaded, insights);
}

#[test]
fn etl_without_scrape_output_is_fatal() {
    let settings = test_settings("missing_input");
    let err = etl::run(&settings).unwrap_err();
    assert!(err.to_string().contains("scrape"));
}

#[test]
fn eda_without_etl_output_is_fatal() {
    let settings = test_settings("missing_csv");
    let err = eda::run(&settings).unwrap_err();
    assert!(err.to_string().contains("etl"));
}

#[test]
fn empty_scrape_degrades_to_empty_report() {
    let settings = test_settings("empty");
    storage::save_json(&Vec::<RawRecord>::new(), &settings.raw_path()).unwrap();

    let (clean, quality) = etl::run(&settings).unwrap();
    assert!(clean.is_empty());
    assert_eq!(quality.total_records, 0);

    let insights = eda::run(&settings).unwrap();
    assert_eq!(insights.overview.total_records, 0);
    assert_eq!(insights.overview.valid_records, 0);
    assert_eq!(insights.price_summary.count, 0);
    assert_eq!(insights.anomalies.price_outlier_count, 0);
    assert!(settings.report_path().exists());
}

#[test]
fn parsed_page_flows_through_transform() {
    let html = r#"
        <html><body>
          <div class="product-card">
            <h2 class="prod-title">Steel Pipe</h2>
            <span class="price">&#8377;500/meter</span>
            <div class="company-name">ABC Corp</div>
            <span class="location">Mumbai, Maharashtra</span>
          </div>
          <div class="product-card">
            <h2 class="prod-title">Steel Pipe</h2>
            <span class="price">&#8377;550/meter</span>
            <div class="company-name">ABC Corp</div>
            <span class="location">Mumbai, Maharashtra</span>
          </div>
        </body></html>
    "#;
    let records = parse::parse_listing_page(html, "industrial machinery");
    assert_eq!(records.len(), 2);

    let (clean, quality) = etl::transform(&records);
    assert_eq!(clean.len(), 1);
    assert_eq!(quality.duplicate_count, 1);
    assert_eq!(clean[0].price, Some(500.0));
    assert_eq!(clean[0].currency.as_deref(), Some("INR"));
    assert_eq!(clean[0].unit.as_deref(), Some("meter"));
    assert!(clean[0].is_major_city);
}
