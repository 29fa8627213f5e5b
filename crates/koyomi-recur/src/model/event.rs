//! Calendar event records: masters, exceptions, and mirrored copies.
//!
//! Two independent link axes run through these records. The recurrence
//! axis ties an exception to its master via `recurring_event_id` and
//! `original_start`. The mirror axis ties copies of one logical event on
//! different calendars together via `parent_id`. Both axes share a `uid`.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::rule::RecurrenceRule;
use crate::error::{Error, Result};

/// Surrogate identifier for a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A calendar event record.
///
/// A master event carries `recurrence`; an exception carries
/// `recurring_event_id` plus `original_start`; a mirror copy carries
/// `parent_id`. The `uid` is private so that assignment always runs
/// through [`CalendarEvent::set_uid`], which enforces immutability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    uid: Option<String>,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Present only on a master, series-defining event.
    pub recurrence: Option<RecurrenceRule>,
    /// Back-reference from an exception to its master event.
    pub recurring_event_id: Option<EventId>,
    /// The start this occurrence would have had under the raw rule.
    pub original_start: Option<DateTime<Utc>>,
    /// Suppressed from the effective series, but kept as a record.
    pub is_cancelled: bool,
    /// Mirror axis: the event this record is a per-calendar copy of.
    pub parent_id: Option<EventId>,
}

impl CalendarEvent {
    /// Creates an event with a fresh id and no links.
    #[must_use]
    pub fn new(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: EventId::new(),
            uid: None,
            title: title.to_string(),
            start,
            end,
            recurrence: None,
            recurring_event_id: None,
            original_start: None,
            is_cancelled: false,
            parent_id: None,
        }
    }

    /// Attaches a recurrence rule, making this a master event.
    #[must_use]
    pub fn with_recurrence(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    /// Links this event as an exception of `master`, overriding the raw
    /// occurrence at `original_start`.
    #[must_use]
    pub fn as_exception_of(mut self, master: EventId, original_start: DateTime<Utc>) -> Self {
        self.recurring_event_id = Some(master);
        self.original_start = Some(original_start);
        self
    }

    /// Links this event as a mirror copy of `parent` on another calendar.
    #[must_use]
    pub fn with_parent(mut self, parent: EventId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Marks the occurrence as cancelled.
    #[must_use]
    pub fn cancelled(mut self) -> Self {
        self.is_cancelled = true;
        self
    }

    #[must_use]
    pub fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    /// True for a series-defining event.
    #[must_use]
    pub fn is_master(&self) -> bool {
        self.recurrence.is_some()
    }

    /// True for an exception record of some master's series.
    #[must_use]
    pub fn is_exception(&self) -> bool {
        self.recurring_event_id.is_some() && self.original_start.is_some()
    }

    /// ## Summary
    /// Assigns the event's uid. Assigning the current value again is a
    /// no-op; assigning onto a null uid succeeds.
    ///
    /// ## Errors
    /// Returns [`Error::UidAlreadySet`] when the uid is already non-null
    /// and `uid` differs from it.
    pub fn set_uid(&mut self, uid: &str) -> Result<()> {
        match self.uid.as_deref() {
            Some(existing) if existing == uid => Ok(()),
            Some(existing) => Err(Error::UidAlreadySet {
                existing: existing.to_string(),
                attempted: uid.to_string(),
            }),
            None => {
                self.uid = Some(uid.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event() -> CalendarEvent {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        CalendarEvent::new("standup", start, end)
    }

    #[test]
    fn set_uid_on_null_succeeds() {
        let mut ev = event();
        assert_eq!(ev.uid(), None);
        ev.set_uid("A").unwrap();
        assert_eq!(ev.uid(), Some("A"));
    }

    #[test]
    fn set_uid_same_value_is_a_noop() {
        let mut ev = event();
        ev.set_uid("A").unwrap();
        ev.set_uid("A").unwrap();
        assert_eq!(ev.uid(), Some("A"));
    }

    #[test]
    fn set_uid_conflicting_value_fails() {
        let mut ev = event();
        ev.set_uid("A").unwrap();
        let err = ev.set_uid("B").unwrap_err();
        match err {
            Error::UidAlreadySet { existing, attempted } => {
                assert_eq!(existing, "A");
                assert_eq!(attempted, "B");
            }
            other => panic!("expected UidAlreadySet, got {other:?}"),
        }
        // The original value survives the failed attempt.
        assert_eq!(ev.uid(), Some("A"));
    }

    #[test]
    fn exception_link_carries_original_start() {
        let master = event();
        let original = Utc.with_ymd_and_hms(2024, 2, 7, 9, 0, 0).unwrap();
        let exc = event().as_exception_of(master.id, original);
        assert!(exc.is_exception());
        assert_eq!(exc.recurring_event_id, Some(master.id));
        assert_eq!(exc.original_start, Some(original));
    }
}
