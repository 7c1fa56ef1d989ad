use serde::{Deserialize, Serialize};

use crate::eda::stats::{AnomalyFlags, FreqEntry, Summary};
use crate::model::QualityReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    pub total_records: usize,
    pub valid_records: usize,
    pub categories: usize,
    pub unique_suppliers: usize,
    pub unique_cities: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SupplierConcentration {
    pub total_unique_suppliers: usize,
    pub avg_listings_per_supplier: f64,
}

/// Aggregate statistics over the valid records. Built once per run,
/// serialized as-is, and fed to the markdown renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsReport {
    pub overview: Overview,
    pub price_summary: Summary,
    pub category_counts: Vec<FreqEntry>,
    pub top_cities: Vec<FreqEntry>,
    pub top_suppliers: Vec<FreqEntry>,
    pub price_buckets: Vec<FreqEntry>,
    pub supplier_concentration: SupplierConcentration,
    pub quality: QualityReport,
    pub anomalies: AnomalyFlags,
    pub key_findings: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn key_findings(insights: &InsightsReport) -> Vec<String> {
    let mut findings = Vec::new();

    if insights.price_summary.count > 0 {
        findings.push(format!(
            "Average listing price is {:.2} (median {:.2}) across {} priced listings",
            insights.price_summary.mean, insights.price_summary.median, insights.price_summary.count
        ));
    }
    if let Some(top) = insights.category_counts.first() {
        findings.push(format!(
            "'{}' is the most listed category with {} listings",
            top.name, top.count
        ));
    }
    if let Some(top) = insights.top_cities.first() {
        findings.push(format!(
            "{} has the highest concentration of suppliers",
            top.name
        ));
    }
    if insights.anomalies.price_outlier_count > 0 {
        findings.push(format!(
            "{} listings ({:.1}%) have prices far outside the typical range",
            insights.anomalies.price_outlier_count, insights.anomalies.price_outlier_pct
        ));
    }
    for field in &insights.anomalies.sparse_fields {
        findings.push(format!("The '{}' field is missing in most records", field));
    }

    findings
}

pub fn recommendations() -> Vec<String> {
    [
        "Focus sourcing efforts on the top categories for better supplier relationships",
        "Consider geographic diversification to reduce supply chain risk",
        "Investigate price outliers for potential negotiation opportunities",
        "Build partnerships with high-volume suppliers in major cities",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

pub fn render_markdown(insights: &InsightsReport) -> String {
    let mut out = String::new();
    out.push_str("# Marketplace Analysis Report\n\n");

    out.push_str("## Executive Summary\n\n");
    let o = &insights.overview;
    out.push_str(&format!("- **Total Records**: {}\n", o.total_records));
    out.push_str(&format!("- **Valid Records**: {}\n", o.valid_records));
    out.push_str(&format!("- **Categories Analyzed**: {}\n", o.categories));
    out.push_str(&format!("- **Unique Suppliers**: {}\n", o.unique_suppliers));
    out.push_str(&format!("- **Unique Cities**: {}\n", o.unique_cities));

    out.push_str("\n## Data Quality\n\n");
    let q = &insights.quality;
    out.push_str(&format!("- Completeness: {:.1}%\n", q.completeness_pct));
    out.push_str(&format!("- Duplicates dropped: {}\n", q.duplicate_count));
    out.push_str(&format!("- Invalid prices: {}\n", q.invalid_price_count));
    out.push_str(&format!(
        "- Missing fields: price {}, location {}, supplier {}, url {}\n",
        q.missing_price, q.missing_location, q.missing_supplier, q.missing_url
    ));

    if insights.price_summary.count > 0 {
        let p = &insights.price_summary;
        out.push_str("\n## Price Statistics\n\n");
        out.push_str(&format!("- count: {}\n", p.count));
        out.push_str(&format!("- mean: {:.2}\n", p.mean));
        out.push_str(&format!("- median: {:.2}\n", p.median));
        out.push_str(&format!("- std dev: {:.2}\n", p.std_dev));
        out.push_str(&format!("- min / max: {:.2} / {:.2}\n", p.min, p.max));
        out.push_str(&format!("- q25 / q75: {:.2} / {:.2}\n", p.q25, p.q75));
    }

    out.push_str("\n## Key Findings\n\n");
    if insights.key_findings.is_empty() {
        out.push_str("- No findings; the dataset is empty.\n");
    }
    for finding in &insights.key_findings {
        out.push_str(&format!("- {}\n", finding));
    }

    out.push_str("\n## Recommendations\n\n");
    for rec in &insights.recommendations {
        out.push_str(&format!("- {}\n", rec));
    }

    out.push_str("\n## Visualizations\n\n");
    out.push_str("Charts generated alongside this report:\n\n");
    for chart in [
        "category_distribution.png",
        "price_distribution.png",
        "top_cities.png",
        "top_suppliers.png",
        "price_buckets.png",
    ] {
        out.push_str(&format!("- `{}`\n", chart));
    }

    out
}
