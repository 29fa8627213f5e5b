//! Expansion limit constants shared across crates.

/// Hard cap on the number of occurrences a single expansion will enumerate.
///
/// This bounds runaway rules (interval 1, unbounded series, huge windows)
/// rather than protecting against any legitimate usage.
pub const MAX_RECURRENCE_INSTANCES: usize = 10_000;

/// Default upper bound, in days, on the width of a query window.
///
/// Bounding expansion cost is the caller's responsibility; this default
/// rejects windows wider than roughly ten years.
pub const DEFAULT_MAX_WINDOW_DAYS: i64 = 3_660;
