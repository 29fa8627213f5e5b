//! Month-nth recurrence: the nth matching weekday of every `interval`-th
//! month ("the last Friday every 2 months").
//!
//! With more than one weekday selected, a "match" is any day whose
//! weekday is in the set, so "first" can land on different weekdays in
//! different months.

use chrono::{Datelike, NaiveDate};

use super::{ParsedRule, util};
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::Instance,
    RuleField::DayOfWeek,
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
    let Some(instance) = parsed.instance else {
        return Vec::new();
    };
    util::nth_matching_day(first.year(), first.month(), &parsed.days, instance)
        .into_iter()
        .collect()
}

pub(super) fn describe(rule: &RecurrenceRule) -> String {
    let every = match rule.interval.unwrap_or(1) {
        1 => "Every month".to_string(),
        n => format!("Every {n} months"),
    };
    let days = util::weekday_labels(&rule.day_of_week);
    match (rule.instance, days.is_empty()) {
        (Some(instance), false) => format!("{every} on the {} {days}", instance.label()),
        _ => every,
    }
}
