//! Yearly recurrence: a fixed month/day in every `interval`-th year.
//!
//! The interval is carried in months and must be a multiple of 12; the
//! generator steps in whole years. A year where the month lacks the day
//! (February 29 outside leap years) is skipped, not clamped.

use chrono::{Datelike, NaiveDate};

use super::{ParsedRule, util};
use crate::model::rule::{RecurrenceRule, RuleField};

pub(super) const REQUIRED_FIELDS: &[RuleField] = &[
    RuleField::RecurrenceType,
    RuleField::Interval,
    RuleField::DayOfMonth,
    RuleField::MonthOfYear,
    RuleField::StartTime,
    RuleField::TimeZone,
];

/// Interval expressed in years; a sub-12-month interval degrades to annual.
pub(super) fn step_years(parsed: &ParsedRule) -> u64 {
    (parsed.interval / 12).max(1)
}

pub(super) fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    let month = parsed.month_of_year?;
    let offset = i32::try_from(k.checked_mul(step_years(parsed))?).ok()?;
    let year = parsed.start_local.date_naive().year().checked_add(offset)?;
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
            "Skipping year without the requested day"
        );
        return Vec::new();
    }
    NaiveDate::from_ymd_opt(first.year(), first.month(), day)
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
    match (rule.month_of_year, rule.day_of_month) {
        (Some(month), Some(day)) if (1..=12).contains(&month) => {
            let month = u32::try_from(month).unwrap_or(1);
            format!("{every} on {} {day}", util::month_label(month))
        }
        _ => every,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::RecurrenceCalculator;
    use chrono::{TimeZone, Utc};

    #[test]
    fn april_fifteenth_each_year() {
        let rule = RecurrenceRule::yearly()
            .with_interval(12)
            .with_month_of_year(4)
            .with_day_of_month(15)
            .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
            .with_time_zone("UTC");
        let calc = RecurrenceCalculator::new();
        let occurrences = calc
            .occurrences_between(
                &rule,
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 12, 31, 0, 0, 0).unwrap(),
            )
            .unwrap();
        assert_eq!(
            occurrences,
            vec![
                Utc.with_ymd_and_hms(2024, 4, 15, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2025, 4, 15, 9, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2026, 4, 15, 9, 0, 0).unwrap(),
            ]
        );
    }

    #[test]
    fn leap_day_skips_common_years() {
        let rule = RecurrenceRule::yearly()
            .with_interval(12)
            .with_month_of_year(2)
            .with_day_of_month(29)
            .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
            .with_time_zone("UTC");
        let calc = RecurrenceCalculator::new();
        let occurrences = calc
            .occurrences_between(
                &rule,
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap(),
            )
            .unwrap();
        // Only the leap years 2024 and 2028 qualify.
        let years: Vec<i32> = occurrences.iter().map(chrono::Datelike::year).collect();
        assert_eq!(years, vec![2024, 2028]);
    }

    #[test]
    fn two_year_interval_expressed_in_months() {
        let rule = RecurrenceRule::yearly()
            .with_interval(24)
            .with_month_of_year(6)
            .with_day_of_month(1)
            .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
            .with_time_zone("UTC");
        let calc = RecurrenceCalculator::new();
        let occurrences = calc
            .occurrences_between(
                &rule,
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2029, 1, 1, 0, 0, 0).unwrap(),
            )
            .unwrap();
        let years: Vec<i32> = occurrences.iter().map(chrono::Datelike::year).collect();
        assert_eq!(years, vec![2024, 2026, 2028]);
    }

    #[test]
    fn describe_uses_month_name() {
        let rule = RecurrenceRule::yearly()
            .with_interval(36)
            .with_month_of_year(4)
            .with_day_of_month(15);
        assert_eq!(describe(&rule), "Every 3 years on April 15");
    }
}
