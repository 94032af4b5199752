//! Strict `YYYY-MM-DD` calendar date handling.
//!
//! # Invariants
//! - Parsing accepts exactly four year digits, two month digits and two day
//!   digits separated by `-`, and the result must be a real calendar day.
//! - Rendering is the inverse of parsing.

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// How far in the past a deadline may lie, in whole years.
pub const MAX_YEARS_PAST: i32 = 50;
/// How far in the future a deadline may lie, in whole years.
pub const MAX_YEARS_FUTURE: i32 = 100;

static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date regex"));

/// Parses a trimmed `YYYY-MM-DD` string into a calendar date.
///
/// Returns `None` for wrong shapes (`2025-1-5`, `15/10/2025`) and for days
/// that do not exist (`2025-02-30`).
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let caps = ISO_DATE.captures(input.trim())?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Renders a date as `YYYY-MM-DD`.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns whether `date` falls inside the deadline sanity window around `today`.
pub fn within_deadline_window(date: NaiveDate, today: NaiveDate) -> bool {
    let earliest = shift_years(today, -MAX_YEARS_PAST);
    let latest = shift_years(today, MAX_YEARS_FUTURE);
    date >= earliest && date <= latest
}

// Feb 29 shifted into a common year clamps to Feb 28.
fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    date.with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}
