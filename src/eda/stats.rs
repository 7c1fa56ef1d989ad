use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::model::QualityReport;

/// Descriptive statistics for one numeric field. All zeros for empty input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub q25: f64,
    pub q75: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreqEntry {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnomalyFlags {
    pub price_outlier_count: usize,
    pub price_outlier_pct: f64,
    pub sparse_fields: Vec<String>,
}

pub fn summarize(values: &[f64]) -> Summary {
    if values.is_empty() {
        return Summary::default();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std_dev = if count > 1 {
        let var = sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
        var.sqrt()
    } else {
        0.0
    };

    Summary {
        count,
        mean,
        median: quantile(&sorted, 0.5),
        std_dev,
        min: sorted[0],
        max: sorted[count - 1],
        q25: quantile(&sorted, 0.25),
        q75: quantile(&sorted, 0.75),
    }
}

/// Linear-interpolated quantile over a sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + frac * (sorted[upper] - sorted[lower])
}

/// Count occurrences, most frequent first; ties break alphabetically so
/// repeated runs produce identical tables.
pub fn frequency_table<I>(values: I) -> Vec<FreqEntry>
where
    I: IntoIterator<Item = String>,
{
    values
        .into_iter()
        .counts()
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        .map(|(name, count)| FreqEntry { name, count })
        .collect()
}

/// Flag prices beyond `sigma` standard deviations and fields missing above
/// `missing_threshold` (a 0..1 share).
pub fn detect_anomalies(
    prices: &[f64],
    summary: &Summary,
    sigma: f64,
    quality: &QualityReport,
    missing_threshold: f64,
) -> AnomalyFlags {
    let outliers = if summary.std_dev > 0.0 {
        prices
            .iter()
            .filter(|v| (*v - summary.mean).abs() > sigma * summary.std_dev)
            .count()
    } else {
        0
    };

    let mut sparse_fields = Vec::new();
    if quality.total_records > 0 {
        let total = quality.total_records as f64;
        for (field, missing) in [
            ("price", quality.missing_price),
            ("location", quality.missing_location),
            ("supplier", quality.missing_supplier),
            ("url", quality.missing_url),
        ] {
            if missing as f64 / total > missing_threshold {
                sparse_fields.push(field.to_string());
            }
        }
    }

    AnomalyFlags {
        price_outlier_count: outliers,
        price_outlier_pct: if prices.is_empty() {
            0.0
        } else {
            outliers as f64 / prices.len() as f64 * 100.0
        },
        sparse_fields,
    }
}
