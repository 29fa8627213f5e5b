//! Weekly recurrence: selected weekdays within every `interval`-th week.
//!
//! Weeks start on Sunday and are anchored to the week containing the
//! series start. Selected days earlier in the anchor week than the start
//! itself are dropped by the generator's start-time floor.

use chrono::{Datelike, Days, NaiveDate};

use super::ParsedRule;
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::DayOfWeek,
    RuleField::StartTime,
    RuleField::TimeZone,
];

/// Sunday of the week containing the series start.
fn anchor(parsed: &ParsedRule) -> Option<NaiveDate> {
    let start = parsed.start_local.date_naive();
    start.checked_sub_days(Days::new(u64::from(start.weekday().num_days_from_sunday())))
}

pub(super) fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    let offset = k.checked_mul(parsed.interval)?.checked_mul(7)?;
    anchor(parsed)?.checked_add_days(Days::new(offset))
}

/// One date per selected weekday, in Sunday-first order.
pub(super) fn period_dates(parsed: &ParsedRule, k: u64) -> Vec<NaiveDate> {
    let Some(week) = period_start(parsed, k) else {
        return Vec::new();
    };
    parsed
        .days
        .iter()
        .filter_map(|day| week.checked_add_days(Days::new(day.days_from_sunday())))
        .collect()
}

pub(super) fn describe(rule: &RecurrenceRule) -> String {
    let every = match rule.interval.unwrap_or(1) {
        1 => "Every week".to_string(),
        n => format!("Every {n} weeks"),
    };
    let days = super::util::weekday_labels(&rule.day_of_week);
    if days.is_empty() {
        every
    } else {
        format!("{every} on {days}")
    }
}
