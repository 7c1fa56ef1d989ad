pub mod charts;
pub mod report;
pub mod stats;

use anyhow::Result;
use tracing::info;

use crate::config::{ensure_parent, Settings};
use crate::model::{CleanRecord, QualityReport};
use crate::storage;
use self::report::InsightsReport;

/// Run the analysis phase over the cleaned dataset: summary statistics,
/// frequency tables, anomaly flags, charts, and both report documents.
/// An empty or all-invalid dataset degrades to a zeroed report.
pub fn run(settings: &Settings) -> Result<InsightsReport> {
    storage::require_input(&settings.processed_path(), "etl")?;
    let records = storage::read_csv(&settings.processed_path())?;
    let quality: QualityReport = if settings.quality_path().exists() {
        storage::load_json(&settings.quality_path())?
    } else {
        QualityReport::default()
    };
    info!(records = records.len(), "loaded cleaned dataset");

    let insights = analyze(&records, &quality, settings);
    if let Err(e) = render_charts(&records, &insights, settings) {
        // Charts are best-effort; the statistical artifacts still land.
        tracing::warn!("chart rendering failed: {e}");
    }

    storage::save_json(&insights, &settings.insights_path())?;
    let markdown = report::render_markdown(&insights);
    let report_path = settings.report_path();
    ensure_parent(&report_path)?;
    std::fs::write(&report_path, markdown)?;

    info!(
        insights = %settings.insights_path().display(),
        report = %report_path.display(),
        "analysis complete"
    );
    Ok(insights)
}

/// Pure aggregation over the dataset; only valid records feed statistics.
pub fn analyze(
    records: &[CleanRecord],
    quality: &QualityReport,
    settings: &Settings,
) -> InsightsReport {
    let valid: Vec<&CleanRecord> = records.iter().filter(|r| r.valid).collect();
    let prices: Vec<f64> = valid.iter().filter_map(|r| r.price).collect();

    let price_summary = stats::summarize(&prices);
    let category_counts = stats::frequency_table(valid.iter().map(|r| r.category.clone()));
    let city_counts = stats::frequency_table(
        valid
            .iter()
            .filter(|r| r.city != "Unknown")
            .map(|r| r.city.clone()),
    );
    let supplier_counts = stats::frequency_table(
        valid
            .iter()
            .filter(|r| r.supplier != "Unknown")
            .map(|r| r.supplier.clone()),
    );
    let price_buckets = stats::frequency_table(
        valid
            .iter()
            .filter_map(|r| r.price_bucket.map(|b| b.label().to_string())),
    );

    let anomalies = stats::detect_anomalies(
        &prices,
        &price_summary,
        settings.anomaly_sigma,
        quality,
        settings.missing_threshold,
    );

    let unique_suppliers = supplier_counts.len();
    let mut insights = InsightsReport {
        overview: report::Overview {
            total_records: records.len(),
            valid_records: valid.len(),
            categories: category_counts.len(),
            unique_suppliers,
            unique_cities: city_counts.len(),
        },
        price_summary,
        category_counts,
        top_cities: city_counts.into_iter().take(settings.top_n).collect(),
        top_suppliers: supplier_counts.into_iter().take(settings.top_n).collect(),
        price_buckets,
        supplier_concentration: report::SupplierConcentration {
            total_unique_suppliers: unique_suppliers,
            avg_listings_per_supplier: if unique_suppliers > 0 {
                valid.len() as f64 / unique_suppliers as f64
            } else {
                0.0
            },
        },
        quality: quality.clone(),
        anomalies,
        key_findings: Vec::new(),
        recommendations: report::recommendations(),
    };
    insights.key_findings = report::key_findings(&insights);
    insights
}

fn render_charts(
    records: &[CleanRecord],
    insights: &InsightsReport,
    settings: &Settings,
) -> Result<()> {
    let prices: Vec<f64> = records
        .iter()
        .filter(|r| r.valid)
        .filter_map(|r| r.price)
        .collect();

    charts::bar_chart(
        &settings.chart_path("category_distribution.png"),
        "Listings by Category",
        "Listings",
        &insights.category_counts,
    )?;
    charts::histogram(
        &settings.chart_path("price_distribution.png"),
        "Price Distribution",
        &prices,
    )?;
    charts::bar_chart(
        &settings.chart_path("top_cities.png"),
        "Top Cities by Listings",
        "Listings",
        &insights.top_cities,
    )?;
    charts::bar_chart(
        &settings.chart_path("top_suppliers.png"),
        "Top Suppliers by Listings",
        "Listings",
        &insights.top_suppliers,
    )?;
    charts::bar_chart(
        &settings.chart_path("price_buckets.png"),
        "Listings by Price Tier",
        "Listings",
        &insights.price_buckets,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PriceBucket;

    fn record(title: &str, category: &str, city: &str, price: Option<f64>, valid: bool) -> CleanRecord {
        CleanRecord {
            title: title.to_string(),
            supplier: "ABC Corp".to_string(),
            category: category.to_string(),
            price,
            currency: price.map(|_| "INR".to_string()),
            unit: None,
            price_bucket: price.map(PriceBucket::from_amount),
            city: city.to_string(),
            state: "Unknown".to_string(),
            is_major_city: false,
            has_image: false,
            url: None,
            dedup_key: format!("{}|abc corp", title.to_lowercase()),
            valid,
        }
    }

    #[test]
    fn empty_dataset_yields_zeroed_report() {
        let insights = analyze(&[], &QualityReport::default(), &Settings::default());
        assert_eq!(insights.overview.total_records, 0);
        assert_eq!(insights.overview.valid_records, 0);
        assert_eq!(insights.price_summary.count, 0);
        assert!(insights.category_counts.is_empty());
        assert!(insights.key_findings.is_empty());
    }

    #[test]
    fn invalid_records_excluded_from_statistics() {
        let records = vec![
            record("Pipe", "machinery", "Mumbai", Some(500.0), true),
            record("Wire", "electronics", "Delhi", Some(900.0), true),
            record("Ghost", "machinery", "Pune", Some(1.0e6), false),
        ];
        let insights = analyze(&records, &QualityReport::default(), &Settings::default());
        assert_eq!(insights.overview.total_records, 3);
        assert_eq!(insights.overview.valid_records, 2);
        assert_eq!(insights.price_summary.count, 2);
        assert_eq!(insights.price_summary.mean, 700.0);
        assert_eq!(insights.category_counts.len(), 2);
    }

    #[test]
    fn unknown_city_excluded_from_geography() {
        let records = vec![
            record("Pipe", "machinery", "Mumbai", Some(500.0), true),
            record("Wire", "machinery", "Unknown", None, true),
        ];
        let insights = analyze(&records, &QualityReport::default(), &Settings::default());
        assert_eq!(insights.top_cities.len(), 1);
        assert_eq!(insights.top_cities[0].name, "Mumbai");
    }
}
