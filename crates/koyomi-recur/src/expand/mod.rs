//! Occurrence expansion: per-type generators and the dispatching calculator.
//!
//! The six recurrence types are a closed set, so dispatch is a `match`
//! over [`RecurrenceType`] rather than runtime-selected strategy objects.
//! Each generator module contributes the shape of one type (its required
//! fields, the local dates of each period, and its pattern summary); the
//! shared driver in this module walks periods in the rule's timezone,
//! applies the series bounds, and converts to UTC at the boundary.

pub mod timezone;

mod daily;
mod month_nth;
mod monthly;
mod util;
mod weekly;
mod year_nth;
mod yearly;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use koyomi_core::config::ExpansionConfig;

use crate::error::{Error, Result};
use crate::model::event::CalendarEvent;
use crate::model::rule::{
    Instance, RecurrenceRule, RecurrenceType, RuleField, Weekday, unbounded_end_time,
};
use crate::reconcile::{EffectiveOccurrence, ExceptionOccurrence, reconcile_exceptions};

/// A rule with its raw tokens parsed and its timezone resolved.
///
/// Construction enforces the per-type required fields, so the generators
/// can treat missing optional fields as defects rather than user input.
pub(crate) struct ParsedRule {
    pub(crate) kind: RecurrenceType,
    /// Always at least 1; a non-positive stored interval is floored.
    pub(crate) interval: u64,
    /// Parsed weekday set, Sunday-first and deduplicated.
    pub(crate) days: Vec<Weekday>,
    pub(crate) day_of_month: Option<u32>,
    pub(crate) month_of_year: Option<u32>,
    pub(crate) instance: Option<Instance>,
    pub(crate) start_utc: DateTime<Utc>,
    pub(crate) start_local: DateTime<Tz>,
    pub(crate) tz: Tz,
    pub(crate) end_time: Option<DateTime<Utc>>,
    pub(crate) occurrences: Option<usize>,
}

impl ParsedRule {
    /// ## Summary
    /// Parses the raw rule entity for expansion.
    ///
    /// ## Errors
    /// - [`Error::MissingField`] for a blank required field
    /// - [`Error::UnsupportedRecurrenceType`] for an unknown type token
    /// - [`Error::UnknownTimeZone`] for an unresolvable zone name
    pub(crate) fn from_rule(rule: &RecurrenceRule) -> Result<Self> {
        let kind = parse_kind(rule)?;
        for field in required_fields_for(kind) {
            if rule.is_blank(*field) {
                return Err(Error::MissingField(field.path()));
            }
        }

        let tz_name = rule.time_zone.as_deref().unwrap_or_default().trim();
        let tz = timezone::resolve(tz_name)?;
        let start_utc = rule
            .start_time
            .ok_or(Error::MissingField(RuleField::StartTime.path()))?;

        let stored_interval = i64::from(rule.interval.unwrap_or(1));
        if stored_interval < 1 {
            tracing::warn!(interval = stored_interval, "Flooring non-positive interval to 1");
        }
        let interval = u64::try_from(stored_interval.max(1)).unwrap_or(1);

        let mut days: Vec<Weekday> = rule
            .day_of_week
            .iter()
            .filter_map(|token| {
                let day = Weekday::parse(token);
                if day.is_none() {
                    tracing::warn!(%token, "Ignoring unknown weekday token");
                }
                day
            })
            .collect();
        days.sort_by_key(|day| day.days_from_sunday());
        days.dedup();

        Ok(Self {
            kind,
            interval,
            days,
            day_of_month: rule
                .day_of_month
                .and_then(|d| u32::try_from(d).ok())
                .filter(|d| *d >= 1),
            month_of_year: rule
                .month_of_year
                .and_then(|m| u32::try_from(m).ok())
                .filter(|m| (1..=12).contains(m)),
            instance: rule.instance,
            start_utc,
            start_local: start_utc.with_timezone(&tz),
            tz,
            end_time: rule.end_time,
            occurrences: rule
                .occurrences
                .map(|n| usize::try_from(n.max(0)).unwrap_or(0)),
        })
    }
}

fn parse_kind(rule: &RecurrenceRule) -> Result<RecurrenceType> {
    let token = rule
        .recurrence_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(Error::MissingField(RuleField::RecurrenceType.path()))?;
    RecurrenceType::parse(token).ok_or_else(|| Error::UnsupportedRecurrenceType(token.to_string()))
}

/// Fields the given recurrence type requires to be non-blank.
#[must_use]
pub fn required_fields_for(kind: RecurrenceType) -> &'static [RuleField] {
    match kind {
        RecurrenceType::Daily => daily::REQUIRED_FIELDS,
        RecurrenceType::Weekly => weekly::REQUIRED_FIELDS,
        RecurrenceType::Monthly => monthly::REQUIRED_FIELDS,
        RecurrenceType::MonthNth => month_nth::REQUIRED_FIELDS,
        RecurrenceType::Yearly => yearly::REQUIRED_FIELDS,
        RecurrenceType::YearNth => year_nth::REQUIRED_FIELDS,
    }
}

/// Largest permitted interval. Year-based intervals are carried in months,
/// so their ceiling is 99 years expressed as 1188 months.
#[must_use]
pub const fn max_interval_for(kind: RecurrenceType) -> i32 {
    match kind {
        RecurrenceType::Daily
        | RecurrenceType::Weekly
        | RecurrenceType::Monthly
        | RecurrenceType::MonthNth => 99,
        RecurrenceType::Yearly | RecurrenceType::YearNth => 1188,
    }
}

/// Divisor the interval must be a multiple of, if the type has one.
#[must_use]
pub const fn interval_multiple_of_for(kind: RecurrenceType) -> Option<i32> {
    match kind {
        RecurrenceType::Yearly | RecurrenceType::YearNth => Some(12),
        RecurrenceType::Daily
        | RecurrenceType::Weekly
        | RecurrenceType::Monthly
        | RecurrenceType::MonthNth => None,
    }
}

fn period_start(parsed: &ParsedRule, k: u64) -> Option<NaiveDate> {
    match parsed.kind {
        RecurrenceType::Daily => daily::period_start(parsed, k),
        RecurrenceType::Weekly => weekly::period_start(parsed, k),
        RecurrenceType::Monthly => monthly::period_start(parsed, k),
        RecurrenceType::MonthNth => month_nth::period_start(parsed, k),
        RecurrenceType::Yearly => yearly::period_start(parsed, k),
        RecurrenceType::YearNth => year_nth::period_start(parsed, k),
    }
}

fn period_dates(parsed: &ParsedRule, k: u64) -> Vec<NaiveDate> {
    match parsed.kind {
        RecurrenceType::Daily => daily::period_dates(parsed, k),
        RecurrenceType::Weekly => weekly::period_dates(parsed, k),
        RecurrenceType::Monthly => monthly::period_dates(parsed, k),
        RecurrenceType::MonthNth => month_nth::period_dates(parsed, k),
        RecurrenceType::Yearly => yearly::period_dates(parsed, k),
        RecurrenceType::YearNth => year_nth::period_dates(parsed, k),
    }
}

/// ## Summary
/// Enumerates the raw series in ascending order.
///
/// Walks periods from the series anchor, floors occurrences at the start
/// time, converts each local candidate to UTC (occurrences erased by a
/// DST gap are skipped), and stops at `scan_end` (exclusive), at `cap`
/// emitted occurrences, or at the period guard.
fn generate(
    parsed: &ParsedRule,
    scan_end: DateTime<Utc>,
    cap: usize,
    period_guard: usize,
) -> Vec<DateTime<Utc>> {
    let mut out = Vec::new();
    if cap == 0 {
        return out;
    }
    let time_of_day = parsed.start_local.time();
    let scan_end_local_date = scan_end.with_timezone(&parsed.tz).date_naive();

    let mut k: u64 = 0;
    'periods: loop {
        let Ok(periods_walked) = usize::try_from(k) else {
            break;
        };
        if periods_walked >= period_guard {
            tracing::warn!(periods = k, "Recurrence scan hit the period guard; series truncated");
            break;
        }
        let Some(start_of_period) = period_start(parsed, k) else {
            break;
        };
        if start_of_period > scan_end_local_date {
            break;
        }
        for date in period_dates(parsed, k) {
            let Some(occurrence) = timezone::local_to_utc(parsed.tz, date.and_time(time_of_day))
            else {
                tracing::trace!(%date, "Skipping occurrence erased by a DST gap");
                continue;
            };
            if occurrence < parsed.start_utc {
                continue;
            }
            if occurrence >= scan_end {
                break 'periods;
            }
            out.push(occurrence);
            if out.len() >= cap {
                break 'periods;
            }
        }
        k += 1;
    }
    out
}

/// Exclusive scan bound: the query window end, tightened by the rule's own
/// end time (inclusive of an occurrence starting exactly on it).
fn series_scan_end(parsed: &ParsedRule, window_end: DateTime<Utc>) -> DateTime<Utc> {
    match parsed.end_time {
        Some(end) => {
            let end_exclusive = end.checked_add_signed(TimeDelta::seconds(1)).unwrap_or(end);
            window_end.min(end_exclusive)
        }
        None => window_end,
    }
}

/// Dispatching facade over the six generators.
///
/// Holds nothing but the expansion limits, so one instance is safe to
/// share across threads and rules.
#[derive(Debug, Clone)]
pub struct RecurrenceCalculator {
    limits: ExpansionConfig,
}

impl Default for RecurrenceCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecurrenceCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self {
            limits: ExpansionConfig::default(),
        }
    }

    /// Creates a calculator with caller-configured limits.
    #[must_use]
    pub fn with_limits(limits: ExpansionConfig) -> Self {
        Self { limits }
    }

    /// ## Summary
    /// Computes the raw occurrence starts inside `[window_start, window_end)`.
    ///
    /// The result is ascending and duplicate-free. The series' own bounds
    /// (`end_time`, `occurrences`) are intersected with the window; the
    /// occurrence count always refers to the raw series from its anchor,
    /// not to what the window happens to show.
    ///
    /// ## Errors
    /// - [`Error::InvalidWindow`] if the window end precedes its start
    /// - [`Error::WindowTooWide`] if the window exceeds the configured span
    /// - parse errors per [`ParsedRule::from_rule`]
    pub fn occurrences_between(
        &self,
        rule: &RecurrenceRule,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<DateTime<Utc>>> {
        if window_end < window_start {
            return Err(Error::InvalidWindow);
        }
        let days = (window_end - window_start).num_days();
        if days > self.limits.max_window_days {
            return Err(Error::WindowTooWide {
                days,
                limit: self.limits.max_window_days,
            });
        }

        let parsed = ParsedRule::from_rule(rule)?;
        let scan_end = series_scan_end(&parsed, window_end);
        let cap = parsed
            .occurrences
            .map_or(self.limits.max_instances, |n| n.min(self.limits.max_instances));
        let mut raw = generate(&parsed, scan_end, cap, self.limits.max_instances);
        if parsed.occurrences.is_none() && raw.len() == self.limits.max_instances {
            tracing::warn!(
                limit = self.limits.max_instances,
                "Expansion hit the instance cap; results are truncated"
            );
        }
        raw.retain(|occurrence| *occurrence >= window_start);
        Ok(raw)
    }

    /// ## Summary
    /// Derives the timestamp of the last occurrence of the series.
    ///
    /// With an explicit `end_time`, this is the last occurrence starting
    /// at or before it (not necessarily `end_time` itself). With an
    /// occurrence count, it is the start of the final counted instance.
    /// An unbounded series yields the far-future sentinel.
    ///
    /// ## Errors
    /// Parse errors per [`ParsedRule::from_rule`].
    pub fn calculated_end_time(&self, rule: &RecurrenceRule) -> Result<DateTime<Utc>> {
        let parsed = ParsedRule::from_rule(rule)?;
        if let Some(end) = parsed.end_time {
            let bound = end.checked_add_signed(TimeDelta::seconds(1)).unwrap_or(end);
            let raw = generate(&parsed, bound, self.limits.max_instances, self.limits.max_instances);
            return Ok(raw.last().copied().unwrap_or(end));
        }
        if let Some(count) = parsed.occurrences {
            let raw = generate(&parsed, unbounded_end_time(), count, self.limits.max_instances);
            return Ok(raw.last().copied().unwrap_or(parsed.start_utc));
        }
        Ok(unbounded_end_time())
    }

    /// Recomputes and stores the rule's derived `calculated_end_time`.
    ///
    /// ## Errors
    /// Parse errors per [`ParsedRule::from_rule`].
    pub fn refresh_calculated_end_time(&self, rule: &mut RecurrenceRule) -> Result<()> {
        rule.calculated_end_time = Some(self.calculated_end_time(rule)?);
        Ok(())
    }

    /// ## Summary
    /// Returns the non-localized pattern summary, e.g.
    /// "Every 2 weeks on Monday, Wednesday".
    ///
    /// ## Errors
    /// [`Error::MissingField`] / [`Error::UnsupportedRecurrenceType`] for
    /// a blank or unknown type token.
    #[expect(clippy::unused_self)]
    pub fn text_description(&self, rule: &RecurrenceRule) -> Result<String> {
        Ok(match parse_kind(rule)? {
            RecurrenceType::Daily => daily::describe(rule),
            RecurrenceType::Weekly => weekly::describe(rule),
            RecurrenceType::Monthly => monthly::describe(rule),
            RecurrenceType::MonthNth => month_nth::describe(rule),
            RecurrenceType::Yearly => yearly::describe(rule),
            RecurrenceType::YearNth => year_nth::describe(rule),
        })
    }

    /// Required fields of the rule's type.
    ///
    /// ## Errors
    /// Fails like [`RecurrenceCalculator::text_description`] on a bad type.
    #[expect(clippy::unused_self)]
    pub fn required_fields(&self, rule: &RecurrenceRule) -> Result<&'static [RuleField]> {
        Ok(required_fields_for(parse_kind(rule)?))
    }

    /// Largest permitted interval for the rule's type.
    ///
    /// ## Errors
    /// Fails like [`RecurrenceCalculator::text_description`] on a bad type.
    #[expect(clippy::unused_self)]
    pub fn max_interval(&self, rule: &RecurrenceRule) -> Result<i32> {
        Ok(max_interval_for(parse_kind(rule)?))
    }

    /// Divisor the interval must be a multiple of, if any.
    ///
    /// ## Errors
    /// Fails like [`RecurrenceCalculator::text_description`] on a bad type.
    #[expect(clippy::unused_self)]
    pub fn interval_multiple_of(&self, rule: &RecurrenceRule) -> Result<Option<i32>> {
        Ok(interval_multiple_of_for(parse_kind(rule)?))
    }

    /// ## Summary
    /// Expands a master event's rule and reconciles its stored exceptions
    /// into the effective series for the window.
    ///
    /// ## Errors
    /// [`Error::MissingField`] if `master` carries no recurrence rule,
    /// otherwise as [`RecurrenceCalculator::occurrences_between`].
    pub fn effective_occurrences(
        &self,
        master: &CalendarEvent,
        exceptions: &[ExceptionOccurrence],
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<EffectiveOccurrence>> {
        let rule = master
            .recurrence
            .as_ref()
            .ok_or(Error::MissingField("recurrence"))?;
        let raw = self.occurrences_between(rule, window_start, window_end)?;
        Ok(reconcile_exceptions(&raw, exceptions, window_start, window_end))
    }
}
