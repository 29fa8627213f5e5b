//! Year-nth recurrence: the nth matching weekday of a fixed month in
//! every `interval`-th year ("the second Tuesday of April every 3 years").

use chrono::{Datelike, NaiveDate};

use super::{ParsedRule, util, yearly};
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::Instance,
    RuleField::DayOfWeek,
    RuleField::MonthOfYear,
    RuleField::StartTime,
    RuleField::TimeZone,
];

pub(super) fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    let month = parsed.month_of_year?;
    let offset = i32::try_from(k.checked_mul(yearly::step_years(parsed))?).ok()?;
    let year = parsed.start_local.date_naive().year().checked_add(offset)?;
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
    let years = (rule.interval.unwrap_or(12) / 12).max(1);
    let every = if years == 1 {
        "Every year".to_string()
    } else {
        format!("Every {years} years")
    };
    let days = util::weekday_labels(&rule.day_of_week);
    match (rule.instance, rule.month_of_year, days.is_empty()) {
        (Some(instance), Some(month), false) if (1..=12).contains(&month) => {
            let month = u32::try_from(month).unwrap_or(1);
            format!(
                "{every} on the {} {days} of {}",
                instance.label(),
                util::month_label(month)
            )
        }
        _ => every,
    }
}
