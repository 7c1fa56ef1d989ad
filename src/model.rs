use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraped listing, exactly as extracted from a result page.
/// Never constructed with an empty title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub title: String,
    pub price_text: Option<String>,
    pub location: Option<String>,
    pub supplier: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub category: String,
    pub scraped_at: DateTime<Utc>,
}

/// Price tier by parsed numeric amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBucket {
    Budget,
    MidRange,
    Premium,
    Enterprise,
}

impl PriceBucket {
    pub fn from_amount(amount: f64) -> Self {
        if amount < 1_000.0 {
            PriceBucket::Budget
        } else if amount < 10_000.0 {
            PriceBucket::MidRange
        } else if amount < 100_000.0 {
            PriceBucket::Premium
        } else {
            PriceBucket::Enterprise
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceBucket::Budget => "Budget",
            PriceBucket::MidRange => "Mid-Range",
            PriceBucket::Premium => "Premium",
            PriceBucket::Enterprise => "Enterprise",
        }
    }
}

/// Cleaned, tabular form of a RawRecord. Invalid records are kept in the
/// dataset with `valid = false` and excluded from statistics downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    pub title: String,
    pub supplier: String,
    pub category: String,
    pub price: Option<f64>,
    pub currency: Option<String>,
    pub unit: Option<String>,
    pub price_bucket: Option<PriceBucket>,
    pub city: String,
    pub state: String,
    pub is_major_city: bool,
    pub has_image: bool,
    pub url: Option<String>,
    pub dedup_key: String,
    pub valid: bool,
}

/// Per-field counts describing how much of the cleaned dataset is missing,
/// invalid, or duplicate. Computed once over the full collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub total_records: usize,
    pub valid_records: usize,
    pub duplicate_count: usize,
    pub invalid_price_count: usize,
    pub missing_price: usize,
    pub missing_location: usize,
    pub missing_supplier: usize,
    pub missing_url: usize,
    pub completeness_pct: f64,
}
