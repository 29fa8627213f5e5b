//! Exception reconciliation: folding stored overrides and cancellations
//! into a raw occurrence sequence.
//!
//! An exception consumes the raw occurrence matching its `original_start`
//! even when its own new start lies outside the queried window; the
//! reverse also holds, so an override rescheduled into the window from an
//! out-of-window original is injected.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::event::{CalendarEvent, EventId};

/// The reconciler's view of one stored exception event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionOccurrence {
    pub event_id: EventId,
    /// The start the occurrence would have had under the raw rule.
    pub original_start: DateTime<Utc>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub is_cancelled: bool,
}

impl ExceptionOccurrence {
    /// Builds the reconciler view from a stored exception record.
    ///
    /// Returns `None` for events that are not exceptions (no master link
    /// or no original start).
    #[must_use]
    pub fn from_event(event: &CalendarEvent) -> Option<Self> {
        event.recurring_event_id?;
        Some(Self {
            event_id: event.id,
            original_start: event.original_start?,
            start: event.start,
            end: event.end,
            is_cancelled: event.is_cancelled,
        })
    }
}

/// One entry of the effective series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectiveOccurrence {
    /// A raw occurrence generated by the rule; the caller applies the
    /// master event's duration.
    Generated { start: DateTime<Utc> },
    /// A stored override at its new time.
    Overridden {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        event_id: EventId,
    },
}

impl EffectiveOccurrence {
    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Generated { start } | Self::Overridden { start, .. } => *start,
        }
    }
}

/// ## Summary
/// Produces the effective series for `[window_start, window_end)` from
/// raw occurrences (already windowed) and stored exceptions.
///
/// Raw occurrences whose start matches an exception's `original_start`
/// are consumed. Non-cancelled exceptions are injected at their new start
/// when it falls inside the window; cancelled ones are omitted entirely.
/// An exception claiming an in-window original that matches no raw
/// occurrence is malformed: it is logged and skipped. Out-of-window
/// originals cannot be checked against the raw sequence and are trusted.
#[must_use]
pub fn reconcile_exceptions(
    raw_occurrences: &[DateTime<Utc>],
    exceptions: &[ExceptionOccurrence],
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<EffectiveOccurrence> {
    let mut by_original: HashMap<DateTime<Utc>, &ExceptionOccurrence> = HashMap::new();
    for exception in exceptions {
        if let Some(first) = by_original.get(&exception.original_start) {
            tracing::warn!(
                original_start = %exception.original_start,
                kept = %first.event_id,
                dropped = %exception.event_id,
                "Duplicate exceptions for one occurrence; keeping the first"
            );
            continue;
        }
        by_original.insert(exception.original_start, exception);
    }

    let in_window = |at: DateTime<Utc>| at >= window_start && at < window_end;

    let mut effective: Vec<EffectiveOccurrence> = raw_occurrences
        .iter()
        .filter(|occurrence| in_window(**occurrence))
        .filter(|occurrence| !by_original.contains_key(occurrence))
        .map(|occurrence| EffectiveOccurrence::Generated { start: *occurrence })
        .collect();

    for exception in by_original.values() {
        let consumes_known_occurrence = raw_occurrences.contains(&exception.original_start);
        if !consumes_known_occurrence && in_window(exception.original_start) {
            tracing::warn!(
                event_id = %exception.event_id,
                original_start = %exception.original_start,
                "Exception matches no raw occurrence of the series; skipping"
            );
            continue;
        }
        if exception.is_cancelled {
            continue;
        }
        if in_window(exception.start) {
            effective.push(EffectiveOccurrence::Overridden {
                start: exception.start,
                end: exception.end,
                event_id: exception.event_id,
            });
        }
    }

    effective.sort_by_key(EffectiveOccurrence::start);
    effective
}
