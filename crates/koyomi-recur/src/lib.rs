//! # koyomi-recur
//!
//! Recurrence core of the koyomi calendar: rule model, per-type
//! occurrence generation, calculated-end-time derivation, exception
//! reconciliation, and uid propagation over the event graph.
//!
//! The crate is pure computation. Expansion and reconciliation are
//! deterministic functions of their inputs and safe to call concurrently;
//! uid propagation computes corrections for the caller to persist and
//! never writes anything itself. Callers bound expansion cost by the
//! query window they choose (see the limits in
//! [`koyomi_core::config::ExpansionConfig`]).

pub mod error;
pub mod expand;
pub mod model;
pub mod reconcile;
pub mod uid;
pub mod validate;

pub use error::{Error, Result};
pub use expand::RecurrenceCalculator;
pub use model::event::{CalendarEvent, EventId};
pub use model::rule::{
    Instance, RecurrenceRule, RecurrenceType, RuleField, Weekday, unbounded_end_time,
};
pub use reconcile::{EffectiveOccurrence, ExceptionOccurrence, reconcile_exceptions};
pub use uid::{
    EventGraph, EventUidChange, UidGenerator, UidPropagation, UuidGenerator, propagate_uid,
};
pub use validate::{FieldViolation, validate};
