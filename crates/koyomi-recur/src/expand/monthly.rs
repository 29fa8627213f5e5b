//! Monthly recurrence: a fixed day of month in every `interval`-th month.
//!
//! A month without that day (day 31 in April, day 30 in February) yields
//! no occurrence; the month is skipped, not clamped to its last day.

use chrono::{Datelike, NaiveDate};

use super::{ParsedRule, util};
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::DayOfMonth,
    RuleField::StartTime,
    RuleField::TimeZone,
];

pub(super) fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    let start = parsed.start_local.date_naive();
    let (year, month) = util::add_months(start.year(), start.month(), k.checked_mul(parsed.interval)?)?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub(super) fn period_dates(parsed: &ParsedRule, k: u64) -> Vec<NaiveDate> {
    let Some(first) = period_start(parsed, k) else {
        return Vec::new();
    };
    let Some(day) = parsed.day_of_month else {
        return Vec::new();
    };
    if day > util::days_in_month(first.year(), first.month()) {
        tracing::trace!(
            year = first.year(),
            month = first.month(),
            day,
            "Skipping month without the requested day"
        );
        return Vec::new();
    }
    NaiveDate::from_ymd_opt(first.year(), first.month(), day)
        .into_iter()
        .collect()
}

pub(super) fn describe(rule: &RecurrenceRule) -> String {
    let every = match rule.interval.unwrap_or(1) {
        1 => "Every month".to_string(),
        n => format!("Every {n} months"),
    };
    match rule.day_of_month {
        Some(day) => format!("{every} on day {day}"),
        None => every,
    }
}
