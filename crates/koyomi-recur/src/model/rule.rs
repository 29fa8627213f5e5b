//! Recurrence rule entity and its vocabulary types.
//!
//! The rule is an edit-flow-facing record: `recurrence_type` and
//! `day_of_week` keep the raw tokens they arrived with so validation can
//! report bad choices instead of failing at the deserialization boundary.
//! The expansion layer parses them into the typed enums below.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Recurrence type: the unit of repetition and how a period selects its days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
    MonthNth,
    Yearly,
    YearNth,
}

impl RecurrenceType {
    /// All known recurrence types, in display order.
    pub const ALL: [Self; 6] = [
        Self::Daily,
        Self::Weekly,
        Self::Monthly,
        Self::MonthNth,
        Self::Yearly,
        Self::YearNth,
    ];

    /// Returns the stored token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::MonthNth => "monthnth",
            Self::Yearly => "yearly",
            Self::YearNth => "yearnth",
        }
    }

    /// Parses a recurrence type token (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "daily" => Self::Daily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "monthnth" => Self::MonthNth,
            "yearly" => Self::Yearly,
            "yearnth" => Self::YearNth,
            _ => return None,
        })
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Returns the stored token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sunday => "sunday",
            Self::Monday => "monday",
            Self::Tuesday => "tuesday",
            Self::Wednesday => "wednesday",
            Self::Thursday => "thursday",
            Self::Friday => "friday",
            Self::Saturday => "saturday",
        }
    }

    /// Returns the capitalized label used in pattern summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    /// Parses a weekday token (case-insensitive).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.to_ascii_lowercase().as_str() {
            "sunday" => Self::Sunday,
            "monday" => Self::Monday,
            "tuesday" => Self::Tuesday,
            "wednesday" => Self::Wednesday,
            "thursday" => Self::Thursday,
            "friday" => Self::Friday,
            "saturday" => Self::Saturday,
            _ => return None,
        })
    }

    /// Returns all weekdays in order (Sunday through Saturday).
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Sunday,
            Self::Monday,
            Self::Tuesday,
            Self::Wednesday,
            Self::Thursday,
            Self::Friday,
            Self::Saturday,
        ]
    }

    /// Offset from Sunday, the first day of the week.
    #[must_use]
    pub const fn days_from_sunday(self) -> u64 {
        match self {
            Self::Sunday => 0,
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
            Self::Saturday => 6,
        }
    }

    /// Converts from a `chrono` weekday.
    #[must_use]
    pub const fn from_chrono(wd: chrono::Weekday) -> Self {
        match wd {
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
            chrono::Weekday::Sun => Self::Sunday,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Instance ordinal: which matching weekday of a month a rule refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instance {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl Instance {
    /// Returns the lowercase label used in pattern summaries.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Second => "second",
            Self::Third => "third",
            Self::Fourth => "fourth",
            Self::Last => "last",
        }
    }

    /// 1-based position within the month, or `None` for `Last`.
    #[must_use]
    pub const fn ordinal(self) -> Option<usize> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Fields of a [`RecurrenceRule`], named by their serialized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleField {
    RecurrenceType,
    Interval,
    DayOfWeek,
    DayOfMonth,
    MonthOfYear,
    Instance,
    StartTime,
    EndTime,
    Occurrences,
    TimeZone,
}

impl RuleField {
    /// Serialized field path, as the surrounding form layer knows it.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::RecurrenceType => "recurrenceType",
            Self::Interval => "interval",
            Self::DayOfWeek => "dayOfWeek",
            Self::DayOfMonth => "dayOfMonth",
            Self::MonthOfYear => "monthOfYear",
            Self::Instance => "instance",
            Self::StartTime => "startTime",
            Self::EndTime => "endTime",
            Self::Occurrences => "occurrences",
            Self::TimeZone => "timeZone",
        }
    }
}

/// Sentinel timestamp used as the calculated end of an unbounded series.
#[must_use]
pub fn unbounded_end_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(9000, 1, 1, 0, 0, 1)
        .single()
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Description of a repeating pattern.
///
/// `start_time` anchors the series: it fixes the time of day of every
/// occurrence and, for week/month/year types, the period alignment.
/// Termination is governed by `end_time`, `occurrences`, or neither
/// (unbounded, capped by the sentinel). `calculated_end_time` is derived
/// and must be recomputed whenever the rule's shape changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecurrenceRule {
    pub recurrence_type: Option<String>,
    pub interval: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub day_of_week: Vec<String>,
    pub day_of_month: Option<i32>,
    pub month_of_year: Option<i32>,
    pub instance: Option<Instance>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub occurrences: Option<i32>,
    pub calculated_end_time: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
}

impl RecurrenceRule {
    /// Creates a rule of the given type with no other fields set.
    #[must_use]
    pub fn new(recurrence_type: RecurrenceType) -> Self {
        Self {
            recurrence_type: Some(recurrence_type.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Creates a daily rule.
    #[must_use]
    pub fn daily() -> Self {
        Self::new(RecurrenceType::Daily)
    }

    /// Creates a weekly rule.
    #[must_use]
    pub fn weekly() -> Self {
        Self::new(RecurrenceType::Weekly)
    }

    /// Creates a monthly (day-of-month) rule.
    #[must_use]
    pub fn monthly() -> Self {
        Self::new(RecurrenceType::Monthly)
    }

    /// Creates a monthly (nth-weekday) rule.
    #[must_use]
    pub fn month_nth() -> Self {
        Self::new(RecurrenceType::MonthNth)
    }

    /// Creates a yearly (day-of-month) rule.
    #[must_use]
    pub fn yearly() -> Self {
        Self::new(RecurrenceType::Yearly)
    }

    /// Creates a yearly (nth-weekday) rule.
    #[must_use]
    pub fn year_nth() -> Self {
        Self::new(RecurrenceType::YearNth)
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: i32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the weekday set.
    #[must_use]
    pub fn with_day_of_week(mut self, days: &[Weekday]) -> Self {
        self.day_of_week = days.iter().map(|d| d.as_str().to_string()).collect();
        self
    }

    /// Sets the day of month.
    #[must_use]
    pub fn with_day_of_month(mut self, day: i32) -> Self {
        self.day_of_month = Some(day);
        self
    }

    /// Sets the month of year.
    #[must_use]
    pub fn with_month_of_year(mut self, month: i32) -> Self {
        self.month_of_year = Some(month);
        self
    }

    /// Sets the instance ordinal.
    #[must_use]
    pub fn with_instance(mut self, instance: Instance) -> Self {
        self.instance = Some(instance);
        self
    }

    /// Sets the series anchor.
    #[must_use]
    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Sets the explicit end bound.
    #[must_use]
    pub fn with_end_time(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self.occurrences = None; // Mutually exclusive
        self
    }

    /// Sets the occurrence count cap.
    #[must_use]
    pub fn with_occurrences(mut self, occurrences: i32) -> Self {
        self.occurrences = Some(occurrences);
        self.end_time = None; // Mutually exclusive
        self
    }

    /// Sets the timezone name.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: &str) -> Self {
        self.time_zone = Some(time_zone.to_string());
        self
    }

    /// True if neither `end_time` nor `occurrences` bounds the series.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.end_time.is_none() && self.occurrences.is_none()
    }

    /// True if the given field carries no usable value.
    #[must_use]
    pub fn is_blank(&self, field: RuleField) -> bool {
        match field {
            RuleField::RecurrenceType => self
                .recurrence_type
                .as_deref()
                .is_none_or(|s| s.trim().is_empty()),
            RuleField::Interval => self.interval.is_none(),
            RuleField::DayOfWeek => self.day_of_week.is_empty(),
            RuleField::DayOfMonth => self.day_of_month.is_none(),
            RuleField::MonthOfYear => self.month_of_year.is_none(),
            RuleField::Instance => self.instance.is_none(),
            RuleField::StartTime => self.start_time.is_none(),
            RuleField::EndTime => self.end_time.is_none(),
            RuleField::Occurrences => self.occurrences.is_none(),
            RuleField::TimeZone => self
                .time_zone
                .as_deref()
                .is_none_or(|s| s.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recurrence_type_parse() {
        assert_eq!(RecurrenceType::parse("daily"), Some(RecurrenceType::Daily));
        assert_eq!(
            RecurrenceType::parse("MonthNth"),
            Some(RecurrenceType::MonthNth)
        );
        assert_eq!(RecurrenceType::parse("fortnightly"), None);
    }

    #[test]
    fn weekday_parse() {
        assert_eq!(Weekday::parse("monday"), Some(Weekday::Monday));
        assert_eq!(Weekday::parse("SATURDAY"), Some(Weekday::Saturday));
        assert_eq!(Weekday::parse("someday"), None);
    }

    #[test]
    fn builder_end_time_and_occurrences_are_mutually_exclusive() {
        let end = unbounded_end_time();
        let rule = RecurrenceRule::daily().with_occurrences(5).with_end_time(end);
        assert_eq!(rule.end_time, Some(end));
        assert_eq!(rule.occurrences, None);

        let rule = RecurrenceRule::daily().with_end_time(end).with_occurrences(5);
        assert_eq!(rule.end_time, None);
        assert_eq!(rule.occurrences, Some(5));
    }

    #[test]
    fn blank_detection_treats_whitespace_as_blank() {
        let mut rule = RecurrenceRule::default();
        assert!(rule.is_blank(RuleField::RecurrenceType));
        rule.recurrence_type = Some("  ".to_string());
        assert!(rule.is_blank(RuleField::RecurrenceType));
        rule.recurrence_type = Some("weekly".to_string());
        assert!(!rule.is_blank(RuleField::RecurrenceType));
    }

    #[test]
    fn sentinel_is_far_future() {
        let sentinel = unbounded_end_time();
        assert_eq!(sentinel.to_rfc3339(), "9000-01-01T00:00:01+00:00");
    }

    #[test]
    fn rule_serializes_with_camel_case_paths() {
        let rule = RecurrenceRule::weekly()
            .with_interval(2)
            .with_day_of_week(&[Weekday::Monday, Weekday::Wednesday]);
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["recurrenceType"], "weekly");
        assert_eq!(json["dayOfWeek"][1], "wednesday");
    }
}
