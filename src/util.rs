// Parsing and numeric helpers.
//
// All the "dirty" CSV handling lives here so the engine modules can work with
// typed, already-validated values.
use crate::types::ActiveFlag;
use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (this also rejects
///   `NaN` and `inf`).
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
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
}

/// Case-insensitive yes/no. Anything else is [`ActiveFlag::Unknown`].
pub fn parse_active(s: Option<&str>) -> ActiveFlag {
    match s.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("yes") => ActiveFlag::Yes,
        Some("no") => ActiveFlag::No,
        _ => ActiveFlag::Unknown,
    }
}

/// Trimmed text, or `None` if the cell is missing or blank.
pub fn non_blank(s: Option<String>) -> Option<String> {
    let s = s?.trim().to_string();
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Completion percentage rounded to one decimal and bounded to `[0, 100]`.
///
/// Negative quantities are clamped to zero, a zero plan yields 0 and
/// over-delivery (done > planned) caps at 100.
pub fn completion_pct(done: f64, planned: f64) -> f64 {
    let planned = if planned.is_finite() { planned.max(0.0) } else { 0.0 };
    let done = if done.is_finite() { done.max(0.0) } else { 0.0 };
    if planned <= 0.0 {
        return 0.0;
    }
    round1((100.0 * done / planned).clamp(0.0, 100.0))
}

/// Quantity usable in a sum: non-finite and negative values count as zero.
pub fn clamp_quantity(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `1,234,567.89` style grouping on the integer part.
    let s = format!("{:.*}", decimals, n.abs());
    // Sign follows the rounded value so -0.3 at 0 decimals prints "0".
    let neg = n < 0.0 && s.chars().any(|c| matches!(c, '1'..='9'));
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_strips_separators_and_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 1,250.5 ")), Some(1250.5));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("NaN")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_date_accepts_dash_and_slash() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        assert_eq!(parse_date_safe(Some("2025-03-09")), Some(d));
        assert_eq!(parse_date_safe(Some("2025/03/09")), Some(d));
        assert_eq!(parse_date_safe(Some("09.03.2025")), None);
    }

    #[test]
    fn active_flag_is_case_insensitive() {
        assert_eq!(parse_active(Some("YES")), ActiveFlag::Yes);
        assert_eq!(parse_active(Some(" no ")), ActiveFlag::No);
        assert_eq!(parse_active(Some("maybe")), ActiveFlag::Unknown);
        assert_eq!(parse_active(None), ActiveFlag::Unknown);
    }

    #[test]
    fn completion_pct_edge_cases() {
        assert_eq!(completion_pct(50.0, 100.0), 50.0);
        assert_eq!(completion_pct(50.0, 0.0), 0.0);
        assert_eq!(completion_pct(250.0, 200.0), 100.0);
        assert_eq!(completion_pct(-5.0, 100.0), 0.0);
        assert_eq!(completion_pct(1.0, 3.0), 33.3);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 1), "-42.0");
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(-0.3, 0), "0");
        assert_eq!(format_number(-0.04, 1), "0.0");
        assert_eq!(format_number(-0.6, 0), "-1");
    }
}
