//! Error types for the recurrence core.
//!
//! Validation problems are collected into `Vec<FieldViolation>` and never
//! surface here; this enum covers the fail-fast errors only.

use thiserror::Error;

use crate::model::event::EventId;

#[derive(Error, Debug)]
pub enum Error {
    /// Rule type is not one of the six known values. Validation rejects
    /// this earlier; hitting it here is a programmer error.
    #[error("Unsupported recurrence type: {0}")]
    UnsupportedRecurrenceType(String),

    /// A field the selected recurrence type requires is blank.
    #[error("Recurrence rule is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("Unknown timezone: {0}")]
    UnknownTimeZone(String),

    /// Attempted change of an already-assigned uid to a different value.
    #[error("Uid already set to `{existing}`, refusing to change it to `{attempted}`")]
    UidAlreadySet { existing: String, attempted: String },

    #[error("Event {0} is not part of the supplied graph")]
    UnknownEvent(EventId),

    #[error("Query window of {days} days exceeds the configured limit of {limit} days")]
    WindowTooWide { days: i64, limit: i64 },

    #[error("Query window end must not precede its start")]
    InvalidWindow,
}

pub type Result<T> = std::result::Result<T, Error>;
