use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use std::sync::LazyLock;

static AMOUNT_THEN_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?\d+(?:\.\d+)?)\s*([A-Za-z]{3})$").expect("valid regex"));
static CODE_THEN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]{3})\s*(-?\d+(?:\.\d+)?)$").expect("valid regex"));
static AMOUNT_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(?:\.\d+)?$").expect("valid regex"));

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A finite decimal number. Rejects `NaN`, `inf` and empty input.
pub fn number(raw: &str) -> Option<f64> {
    let n: f64 = raw.trim().parse().ok()?;
    n.is_finite().then_some(n)
}

/// Parse a date or date-time. Values without an offset are taken as UTC.
pub fn datetime(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Normalize to `YYYY-MM-DDTHH:MM:SS.sssZ`; input that is not a date is returned as given.
pub fn normalize_date(raw: &str) -> String {
    let trimmed = raw.trim();
    match datetime(trimmed) {
        Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
        None => trimmed.to_string(),
    }
}

/// `"100 USD"`, `"USD100"`, `"USD 100"`, `"100USD"` or a bare `"100"`.
pub fn currency(raw: &str) -> Option<(f64, Option<String>)> {
    let s = raw.trim();
    if let Some(caps) = AMOUNT_THEN_CODE.captures(s) {
        return Some((number(&caps[1])?, Some(caps[2].to_ascii_uppercase())));
    }
    if let Some(caps) = CODE_THEN_AMOUNT.captures(s) {
        return Some((number(&caps[2])?, Some(caps[1].to_ascii_uppercase())));
    }
    if AMOUNT_ONLY.is_match(s) {
        return Some((number(s)?, None));
    }
    None
}

fn is_country_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// `"US"`, `"US,United States"` or `"United States,US"` into `(code, name)`.
/// A lone code doubles as its own name.
pub fn country(raw: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [code] if is_country_code(code) => {
            let code = code.to_ascii_uppercase();
            Some((code.clone(), code))
        }
        [a, b] if is_country_code(a) => Some((a.to_ascii_uppercase(), b.to_string())),
        [a, b] if is_country_code(b) => Some((b.to_ascii_uppercase(), a.to_string())),
        _ => None,
    }
}
