use std::sync::LazyLock;

use regex::Regex;

static MULTI_WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
// Keep alphanumerics and basic punctuation; everything else is markup noise.
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s,.\-&()]").unwrap());

const MAJOR_CITIES: &[&str] = &[
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Surat",
    "Jaipur",
];

/// Trim, collapse whitespace, and strip stray non-text characters.
pub fn normalize_text(s: &str) -> String {
    let collapsed = MULTI_WS_RE.replace_all(s.trim(), " ");
    NOISE_RE.replace_all(&collapsed, "").trim().to_string()
}

/// Split free-text location into (city, state) at the first comma.
/// `"Unknown"` stands in for anything the heuristic cannot recover.
pub fn split_location(location: Option<&str>) -> (String, String) {
    let text = match location {
        Some(l) if !l.trim().is_empty() => normalize_text(l),
        _ => return ("Unknown".to_string(), "Unknown".to_string()),
    };
    if text.is_empty() {
        return ("Unknown".to_string(), "Unknown".to_string());
    }

    match text.split_once(',') {
        Some((city, state)) => {
            let city = city.trim();
            let state = state.rsplit(',').next().unwrap_or(state).trim();
            (
                if city.is_empty() { "Unknown" } else { city }.to_string(),
                if state.is_empty() { "Unknown" } else { state }.to_string(),
            )
        }
        None => (text, "Unknown".to_string()),
    }
}

pub fn is_major_city(city: &str) -> bool {
    MAJOR_CITIES.iter().any(|m| m.eq_ignore_ascii_case(city))
}
