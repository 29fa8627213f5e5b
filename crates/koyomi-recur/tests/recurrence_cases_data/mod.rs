use chrono::{TimeZone, Utc};
use koyomi_recur::{Instance, RecurrenceRule, Weekday};

pub struct RecurrenceCase {
    pub name: &'static str,
    pub rule: RecurrenceRule,
    pub window_start: &'static str,
    pub window_end: &'static str,
    pub expected: &'static [&'static str],
}

pub fn recurrence_cases() -> Vec<RecurrenceCase> {
    vec![
        RecurrenceCase {
            name: "daily_every_second_day",
            rule: RecurrenceRule::daily()
                .with_interval(2)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-01-10T00:00:00+00:00",
            expected: &[
                "2024-01-01T09:00:00+00:00",
                "2024-01-03T09:00:00+00:00",
                "2024-01-05T09:00:00+00:00",
                "2024-01-07T09:00:00+00:00",
                "2024-01-09T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "daily_occurrence_count",
            rule: RecurrenceRule::daily()
                .with_interval(1)
                .with_occurrences(3)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-02-01T00:00:00+00:00",
            expected: &[
                "2024-01-01T09:00:00+00:00",
                "2024-01-02T09:00:00+00:00",
                "2024-01-03T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "weekly_monday_wednesday",
            rule: RecurrenceRule::weekly()
                .with_interval(1)
                .with_day_of_week(&[Weekday::Monday, Weekday::Wednesday])
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-01-15T00:00:00+00:00",
            expected: &[
                "2024-01-01T09:00:00+00:00",
                "2024-01-03T09:00:00+00:00",
                "2024-01-08T09:00:00+00:00",
                "2024-01-10T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "weekly_end_time_inclusive_of_last_start",
            rule: RecurrenceRule::weekly()
                .with_interval(1)
                .with_day_of_week(&[Weekday::Monday])
                .with_end_time(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap())
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-02-01T00:00:00+00:00",
            expected: &[
                "2024-01-01T09:00:00+00:00",
                "2024-01-08T09:00:00+00:00",
                "2024-01-15T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "monthly_day_31_skips_short_months",
            rule: RecurrenceRule::monthly()
                .with_interval(1)
                .with_day_of_month(31)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-07-01T00:00:00+00:00",
            expected: &[
                "2024-01-31T09:00:00+00:00",
                "2024-03-31T09:00:00+00:00",
                "2024-05-31T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "monthly_alignment_follows_the_rule_timezone",
            // 09:00 New York: UTC-5 before the March switch, UTC-4 after.
            rule: RecurrenceRule::monthly()
                .with_interval(1)
                .with_day_of_month(15)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 15, 14, 0, 0).unwrap())
                .with_time_zone("America/New_York"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-05-01T00:00:00+00:00",
            expected: &[
                "2024-01-15T14:00:00+00:00",
                "2024-02-15T14:00:00+00:00",
                "2024-03-15T13:00:00+00:00",
                "2024-04-15T13:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "month_nth_last_friday",
            rule: RecurrenceRule::month_nth()
                .with_interval(1)
                .with_instance(Instance::Last)
                .with_day_of_week(&[Weekday::Friday])
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2024-03-01T00:00:00+00:00",
            expected: &[
                "2024-01-26T09:00:00+00:00",
                "2024-02-23T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "yearly_april_fifteenth",
            rule: RecurrenceRule::yearly()
                .with_interval(12)
                .with_month_of_year(4)
                .with_day_of_month(15)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2026-12-31T00:00:00+00:00",
            expected: &[
                "2024-04-15T09:00:00+00:00",
                "2025-04-15T09:00:00+00:00",
                "2026-04-15T09:00:00+00:00",
            ],
        },
        RecurrenceCase {
            name: "year_nth_second_tuesday_of_april",
            rule: RecurrenceRule::year_nth()
                .with_interval(36)
                .with_instance(Instance::Second)
                .with_day_of_week(&[Weekday::Tuesday])
                .with_month_of_year(4)
                .with_start_time(Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap())
                .with_time_zone("UTC"),
            window_start: "2024-01-01T00:00:00+00:00",
            window_end: "2030-12-01T00:00:00+00:00",
            expected: &[
                "2024-04-09T09:00:00+00:00",
                "2027-04-13T09:00:00+00:00",
                "2030-04-09T09:00:00+00:00",
            ],
        },
    ]
}
