use std::sync::LazyLock;

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};

use crate::model::RawRecord;

const BASE_URL: &str = "https://www.indiamart.com";

// The site's markup changes without notice; these selectors are the whole
// adapter surface. Candidates are tried in order and the first one that
// matches anything wins.
static CARD_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    [
        "div[class*='card']",
        "div[class*='product']",
        "li[class*='listing']",
    ]
    .iter()
    .map(|s| Selector::parse(s).unwrap())
    .collect()
});

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h2[class*='title'], h3[class*='title'], [class*='name'], h2, h3").unwrap()
});
static PRICE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class*='price']").unwrap());
static SUPPLIER_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class*='company'], [class*='seller']").unwrap());
static LOCATION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class*='location'], [class*='city']").unwrap());
static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static IMG_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").unwrap());

/// Parse one search result page into records. Cards without a title are
/// dropped; every other field is optional.
pub fn parse_listing_page(html: &str, category: &str) -> Vec<RawRecord> {
    let doc = Html::parse_document(html);

    let cards: Vec<ElementRef> = CARD_SELECTORS
        .iter()
        .map(|sel| doc.select(sel).collect::<Vec<_>>())
        .find(|matches| !matches.is_empty())
        .unwrap_or_default();

    cards
        .iter()
        .filter_map(|card| extract_record(card, category))
        .collect()
}

fn extract_record(card: &ElementRef, category: &str) -> Option<RawRecord> {
    let title = select_text(card, &TITLE_SEL)?;

    Some(RawRecord {
        title,
        price_text: select_text(card, &PRICE_SEL),
        location: select_text(card, &LOCATION_SEL),
        supplier: select_text(card, &SUPPLIER_SEL),
        url: select_href(card),
        image_url: card
            .select(&IMG_SEL)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string),
        category: category.to_string(),
        scraped_at: Utc::now(),
    })
}

/// First matching element's text, whitespace-collapsed; None when empty.
fn select_text(card: &ElementRef, sel: &Selector) -> Option<String> {
    let element = card.select(sel).next()?;
    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn select_href(card: &ElementRef) -> Option<String> {
    let href = card
        .select(&LINK_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))?;
    if href.starts_with("http") {
        Some(href.to_string())
    } else {
        reqwest::Url::parse(BASE_URL)
            .ok()?
            .join(href)
            .ok()
            .map(|u| u.to_string())
    }
}
