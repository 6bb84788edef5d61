// Utility helpers for parsing and number formatting.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

/// Like [`parse_f64_safe`] but a missing or blank value counts as zero.
///
/// Returns `None` only when something is present and unparseable, so the
/// caller can tell a malformed row from an empty cell.
pub fn parse_amount(s: Option<&str>) -> Option<f64> {
    match s.map(str::trim) {
        None | Some("") => Some(0.0),
        Some(v) => parse_f64_safe(Some(v)).filter(|n| *n >= 0.0),
    }
}

/// Normalize a begin date.
///
/// The dataset stores `M/D/YYYY H:MM:SS`; only the date part is kept.
/// ISO `YYYY-MM-DD` is accepted as well.
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    let date_part = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%Y-%m-%d"))
        .ok()
}

pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: u64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Dollar amounts in the report are large enough that billions read better
/// than a 12-digit figure.
pub fn format_dollars(n: f64) -> String {
    if n.abs() >= 1e9 {
        format!("${}B", format_number(n / 1e9, 2))
    } else if n.abs() >= 1e6 {
        format!("${}M", format_number(n / 1e6, 2))
    } else {
        format!("${}", format_number(n, 0))
    }
}
