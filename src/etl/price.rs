use std::sync::LazyLock;

use regex::Regex;

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\d,]+(?:\.\d+)?").unwrap());
static UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\s*([A-Za-z]+(?: [A-Za-z]+)?)").unwrap());
static INR_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\b(rs|inr)\b").unwrap());
static USD_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\busd\b").unwrap());
static EUR_WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\beur\b").unwrap());

// Listings above one crore are scrape artifacts, not real offers.
const MAX_SANE_PRICE: f64 = 10_000_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrice {
    pub amount: f64,
    pub currency: Option<String>,
    pub unit: Option<String>,
}

/// Parse marketplace price text such as `₹1,200/piece`, `Rs 500 / meter`
/// or `$50 - $75` (ranges keep the low bound). Unknown formats and
/// out-of-range amounts yield `None`, never an error.
pub fn parse_price(text: &str) -> Option<ParsedPrice> {
    let amount_str = AMOUNT_RE.find(text)?.as_str().replace(',', "");
    let amount: f64 = amount_str.parse().ok()?;
    if amount <= 0.0 || amount >= MAX_SANE_PRICE {
        return None;
    }

    Some(ParsedPrice {
        amount,
        currency: detect_currency(text),
        unit: UNIT_RE
            .captures(text)
            .map(|c| c[1].trim().to_lowercase()),
    })
}

fn detect_currency(text: &str) -> Option<String> {
    if text.contains('₹') || INR_WORD_RE.is_match(text) {
        Some("INR".to_string())
    } else if text.contains('$') || USD_WORD_RE.is_match(text) {
        Some("USD".to_string())
    } else if text.contains('€') || EUR_WORD_RE.is_match(text) {
        Some("EUR".to_string())
    } else {
        None
    }
}
