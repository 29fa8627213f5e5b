//! Timezone resolution and local-to-UTC conversion.
//!
//! All period alignment is computed as naive local dates in the rule's
//! zone; this module is the single place where those locals cross back
//! into UTC, including the two DST edge cases: a time that falls into a
//! spring-forward gap does not exist (the occurrence is skipped by the
//! caller), and a time repeated by a fall-back fold resolves to the
//! first (earlier) instant.

use std::str::FromStr;

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{Error, Result};

/// ## Summary
/// Resolves an IANA timezone name to a `chrono_tz::Tz`.
///
/// ## Errors
/// Returns [`Error::UnknownTimeZone`] if the name is not in the tz database.
pub fn resolve(tzid: &str) -> Result<Tz> {
    Tz::from_str(tzid).map_err(|_e| Error::UnknownTimeZone(tzid.to_string()))
}

/// ## Summary
/// Converts a naive local datetime in `tz` to UTC.
///
/// Returns `None` for non-existent local times (DST gap); an ambiguous
/// local time (DST fold) maps to its first occurrence.
#[must_use]
pub fn local_to_utc(tz: Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    match tz.from_local_datetime(&local) {
        LocalResult::None => None,
        LocalResult::Single(dt) => Some(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(first, _second) => Some(first.with_timezone(&Utc)),
    }
}
