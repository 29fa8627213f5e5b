//! Daily recurrence: one occurrence every `interval` days.

use chrono::{Days, NaiveDate};

use super::ParsedRule;
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::StartTime,
    RuleField::TimeZone,
];

/// Local date of the `k`-th period: the anchor date shifted `k * interval` days.
pub(super) fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    let offset = k.checked_mul(parsed.interval)?;
    parsed
        .start_local
        .date_naive()
        .checked_add_days(Days::new(offset))
}

/// A daily period holds exactly its own date.
pub(super) fn period_dates(parsed: &ParsedRule, k: u64) -> Vec<NaiveDate> {
    period_start(parsed, k).into_iter().collect()
}

pub(super) fn describe(rule: &RecurrenceRule) -> String {
    match rule.interval.unwrap_or(1) {
        1 => "Every day".to_string(),
        n => format!("Every {n} days"),
    }
}
