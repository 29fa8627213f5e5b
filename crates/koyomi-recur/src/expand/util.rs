//! Calendar arithmetic shared by the per-type generators.

use chrono::{Datelike, NaiveDate};

use crate::model::rule::{Instance, Weekday};

/// Returns the number of days in a month.
#[must_use]
pub(super) fn days_in_month(year: i32, month: u32) -> u32 {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .or_else(|| NaiveDate::from_ymd_opt(year + 1, 1, 1))
        .map_or(31, |d| d.pred_opt().map_or(31, |p| p.day()))
}

/// Advances a (year, 1-based month) pair by `months`, without touching days.
#[must_use]
pub(super) fn add_months(year: i32, month: u32, months: u64) -> Option<(i32, u32)> {
    let month0 = i64::from(month).checked_sub(1)? + i64::try_from(months).ok()?;
    let year = i64::from(year) + month0.div_euclid(12);
    let month0 = month0.rem_euclid(12);
    Some((
        i32::try_from(year).ok()?,
        u32::try_from(month0).ok()? + 1,
    ))
}

/// ## Summary
/// Picks the `instance`-th day of the month whose weekday is in `days`.
///
/// `Instance::Last` counts backward from month end. Returns `None` when
/// the month has fewer matching days than the requested ordinal, or when
/// `days` is empty.
#[must_use]
pub(super) fn nth_matching_day(
    year: i32,
    month: u32,
    days: &[Weekday],
    instance: Instance,
) -> Option<NaiveDate> {
    if days.is_empty() {
        return None;
    }
    let matches: Vec<NaiveDate> = (1..=days_in_month(year, month))
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| days.contains(&Weekday::from_chrono(date.weekday())))
        .collect();

    match instance.ordinal() {
        Some(n) => matches.get(n - 1).copied(),
        None => matches.last().copied(),
    }
}

/// Month name for pattern summaries.
#[must_use]
pub(super) fn month_label(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

/// Joins weekday labels for pattern summaries ("Monday, Wednesday").
#[must_use]
pub(super) fn weekday_labels(tokens: &[String]) -> String {
    let labels: Vec<&str> = tokens
        .iter()
        .filter_map(|t| Weekday::parse(t))
        .map(Weekday::label)
        .collect();
    labels.join(", ")
}
